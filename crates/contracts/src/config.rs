//! Sensor model configuration contracts that can be shared across crates.

use serde::{Deserialize, Serialize};

use crate::Dimension3d;

/// Complete sensor model configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorModelConfig {
    /// Behaviour when a step has no inbound payload
    #[serde(default)]
    pub fallback: InputFallback,

    /// Detection model parameters
    #[serde(default)]
    pub fusion: FusionConfig,

    /// Ground-truth scenario used when acting as source
    #[serde(default)]
    pub scenario: ScenarioConfig,

    /// Logging setup
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Range / field-of-view / probability model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    /// Maximum detection range (inclusive)
    pub max_range: f64,
    /// Minimum `rel_x / distance` for a detection (cosine of the FOV half-angle)
    pub min_forward_cosine: f64,
    /// Range at which the existence probability peaks
    pub probability_peak_range: f64,
    /// Range scale of the probability bump
    pub probability_width: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            max_range: 150.0,
            min_forward_cosine: 0.866025,
            probability_peak_range: 75.0,
            probability_width: 75.0,
        }
    }
}

/// One synthesized vehicle track
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLane {
    /// Longitudinal position at t=0
    pub x_offset: f64,
    /// Lateral centre line
    pub y_offset: f64,
    /// Constant longitudinal speed, must be non-zero
    pub x_speed: f64,
}

const fn lane(x_offset: f64, y_offset: f64, x_speed: f64) -> ScenarioLane {
    ScenarioLane {
        x_offset,
        y_offset,
        x_speed,
    }
}

/// Built-in ten vehicle scenario
pub const DEFAULT_LANES: [ScenarioLane; 10] = [
    lane(0.0, 3.0, 29.0),
    lane(40.0, 3.0, 30.0),
    lane(100.0, 3.0, 31.0),
    lane(100.0, 0.5, 25.0),
    lane(0.0, 0.0, 26.0),
    lane(150.0, -0.5, 28.0),
    lane(5.0, -3.0, 20.0),
    lane(45.0, -3.0, 22.0),
    lane(85.0, -3.0, 22.5),
    lane(125.0, -3.0, 23.0),
];

/// Ground-truth scenario table
///
/// Read-only after start-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Index (and id) of the ego vehicle
    pub ego_index: usize,
    /// Amplitude of the lateral sine sway
    pub lateral_amplitude: f64,
    /// Bounding box shared by all vehicles
    pub dimension: Dimension3d,
    /// One entry per vehicle
    pub lanes: Vec<ScenarioLane>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            ego_index: 4,
            lateral_amplitude: 0.25,
            dimension: Dimension3d {
                length: 5.0,
                width: 2.0,
                height: 1.5,
            },
            lanes: DEFAULT_LANES.to_vec(),
        }
    }
}

/// What to publish when no inbound payload is present
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputFallback {
    /// Act as ground-truth source for that step
    #[default]
    Synthesize,
    /// Publish nothing (`size = 0`, `valid = false`, `count = 0`)
    Reset,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset
    pub level: String,
    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
