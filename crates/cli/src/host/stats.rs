//! Run statistics.

use std::time::Duration;

use observability::{StepMode, StepStatsAggregator};

use super::StepReport;

/// Statistics from a co-simulation run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Communication steps completed
    pub steps: u64,

    /// Steps whose output was valid
    pub valid_steps: u64,

    /// Total objects reported over the run
    pub total_objects: u64,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Final simulation time
    pub end_time: f64,

    /// Per-step aggregates
    pub aggregator: StepStatsAggregator,
}

impl RunStats {
    pub fn record(&mut self, report: &StepReport) {
        self.steps += 1;
        self.end_time = report.time;
        if report.valid {
            self.valid_steps += 1;
        }
        self.total_objects += report.objects.len() as u64;

        let mode = match report.mode.as_deref() {
            Some("source") => StepMode::Source,
            Some("fuse") => StepMode::Fuse,
            _ => StepMode::Reset,
        };
        self.aggregator.record_step(mode);
        if mode == StepMode::Fuse {
            self.aggregator.record_detections(report.objects.len());
        }
        self.aggregator.record_payload(report.payload_bytes);
        for object in &report.objects {
            self.aggregator.record_probability(object.existence_probability);
        }
    }

    /// Steps per wall-clock second
    pub fn steps_per_sec(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.steps as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    pub fn print_summary(&self) {
        println!();
        println!("=== Run Statistics ===");
        println!("  Duration: {:.3}s", self.duration.as_secs_f64());
        println!("  Steps: {} ({:.1}/s)", self.steps, self.steps_per_sec());
        println!("  Valid outputs: {}", self.valid_steps);
        println!("  Objects reported: {}", self.total_objects);
        println!("  Simulation end time: {:.3}s", self.end_time);
        println!();
        print!("{}", self.aggregator.summary());
    }
}
