//! 传感器模型指标收集模块
//!
//! 基于 `metrics` facade 记录每一步的运行指标，并在内存中聚合以便输出摘要。

use std::fmt;

use metrics::{counter, gauge, histogram};

/// 单步执行的分支
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StepMode {
    /// 合成并发布真值场景
    Source,
    /// 解码输入载荷并融合
    Fuse,
    /// 未发布任何数据
    Reset,
}

impl StepMode {
    pub fn as_str(self) -> &'static str {
        match self {
            StepMode::Source => "source",
            StepMode::Fuse => "fuse",
            StepMode::Reset => "reset",
        }
    }
}

impl fmt::Display for StepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 记录一次完成的单步
pub fn record_step(mode: StepMode) {
    counter!("osmp_steps_total", "mode" => mode.as_str()).increment(1);
}

/// 记录融合输出的目标数
pub fn record_detections(count: usize) {
    gauge!("osmp_detections").set(count as f64);
    histogram!("osmp_detections_hist").record(count as f64);
}

/// 记录发布载荷的字节数
pub fn record_payload_bytes(size: usize) {
    histogram!("osmp_payload_bytes").record(size as f64);
}

/// 记录输入载荷解码失败
pub fn record_decode_failure() {
    counter!("osmp_payload_decode_failures_total").increment(1);
}

/// 单步指标聚合器
///
/// 在内存中聚合指标，便于统计和输出摘要。
#[derive(Debug, Clone, Default)]
pub struct StepStatsAggregator {
    pub total_steps: u64,
    pub source_steps: u64,
    pub fuse_steps: u64,
    pub reset_steps: u64,
    pub detection_stats: RunningStats,
    pub payload_stats: RunningStats,
    pub probability_stats: RunningStats,
}

impl StepStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_step(&mut self, mode: StepMode) {
        self.total_steps += 1;
        match mode {
            StepMode::Source => self.source_steps += 1,
            StepMode::Fuse => self.fuse_steps += 1,
            StepMode::Reset => self.reset_steps += 1,
        }
    }

    pub fn record_detections(&mut self, count: usize) {
        self.detection_stats.push(count as f64);
    }

    pub fn record_payload(&mut self, size: usize) {
        self.payload_stats.push(size as f64);
    }

    pub fn record_probability(&mut self, probability: f64) {
        self.probability_stats.push(probability);
    }

    pub fn summary(&self) -> StepSummary {
        StepSummary {
            total_steps: self.total_steps,
            source_steps: self.source_steps,
            fuse_steps: self.fuse_steps,
            reset_steps: self.reset_steps,
            detections: StatsSummary::from(&self.detection_stats),
            payload_bytes: StatsSummary::from(&self.payload_stats),
            existence_probability: StatsSummary::from(&self.probability_stats),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// 指标摘要
#[derive(Debug, Clone, Default)]
pub struct StepSummary {
    pub total_steps: u64,
    pub source_steps: u64,
    pub fuse_steps: u64,
    pub reset_steps: u64,
    pub detections: StatsSummary,
    pub payload_bytes: StatsSummary,
    pub existence_probability: StatsSummary,
}

impl fmt::Display for StepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Sensor Model Summary ===")?;
        writeln!(f, "Total steps: {}", self.total_steps)?;
        writeln!(
            f,
            "Steps by mode: source={}, fuse={}, reset={}",
            self.source_steps, self.fuse_steps, self.reset_steps
        )?;
        writeln!(f, "Detections per step: {}", self.detections)?;
        writeln!(f, "Payload bytes: {}", self.payload_bytes)?;
        writeln!(f, "Existence probability: {}", self.existence_probability)?;
        Ok(())
    }
}

/// 统计摘要
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count,
            min: stats.min,
            max: stats.max,
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// 在线统计 (Welford 算法)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Welford update
    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            (self.min, self.max) = (value, value);
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;

        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// 样本方差，样本数少于 2 时为 0
    pub fn variance(&self) -> f64 {
        match self.count {
            0 | 1 => 0.0,
            n => self.m2 / (n - 1) as f64,
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
