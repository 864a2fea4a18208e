//! `run` command implementation.

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use contracts::SensorModelConfig;
use tracing::info;

use crate::cli::RunArgs;
use crate::error::CliError;
use crate::host::{CoSimulation, RunStats, StepReport};

/// Execute the `run` command
pub fn run_cosim(args: &RunArgs) -> Result<()> {
    let config = load_config(args.config.as_deref())?;

    if args.metrics_port != 0 {
        observability::init_metrics_only(args.metrics_port)?;
    }

    info!(
        steps = args.steps,
        step_size = args.step_size,
        start_time = args.start_time,
        fallback = ?config.fallback,
        max_range = config.fusion.max_range,
        "Starting co-simulation"
    );

    let mut cosim = CoSimulation::new(config, args.start_time, args.step_size)
        .context("Failed to set up co-simulation")?;
    let mut stats = RunStats::default();
    let started = Instant::now();

    for _ in 0..args.steps {
        let report = cosim
            .step()
            .with_context(|| format!("Step at t={} failed", cosim.time()))?;

        if args.json {
            println!(
                "{}",
                serde_json::to_string(&report).context("Failed to serialize step report")?
            );
        } else {
            print_report(&report);
        }
        stats.record(&report);
    }

    if let Some(record) = cosim.source_record()? {
        info!(
            vehicles = record.ground_truth.map(|gt| gt.vehicles.len()).unwrap_or(0),
            "Last ground truth published by source"
        );
    }

    cosim.terminate()?;
    stats.duration = started.elapsed();

    info!(
        steps = stats.steps,
        objects = stats.total_objects,
        duration_secs = stats.duration.as_secs_f64(),
        "Co-simulation completed"
    );
    if !args.json {
        stats.print_summary();
    }

    Ok(())
}

/// Load from `path`, or use built-in defaults
pub(crate) fn load_config(path: Option<&Path>) -> Result<SensorModelConfig> {
    let Some(path) = path else {
        info!("No configuration file given, using defaults");
        return Ok(SensorModelConfig::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()).into());
    }

    info!(config = %path.display(), "Loading configuration");
    config_loader::ConfigLoader::load_from_path(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn print_report(report: &StepReport) {
    println!(
        "t={:.3} mode={} valid={} count={} bytes={}",
        report.time,
        report.mode.as_deref().unwrap_or("-"),
        report.valid,
        report.count,
        report.payload_bytes
    );
    for object in &report.objects {
        println!(
            "  #{:<2} x={:>8.2} y={:>6.2} z={:>5.2}  p={:.3}",
            object.tracking_id,
            object.position.x,
            object.position.y,
            object.position.z,
            object.existence_probability
        );
    }
}
