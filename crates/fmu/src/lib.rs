//! # FMU
//!
//! FMI 1.0 Co-Simulation shared library wrapping [`sensor_model::SensorModel`].
//!
//! Built as a `cdylib` for co-simulation hosts and as an `rlib` so the entry
//! points can be exercised from Rust tests.
//!
//! Configuration is read from `<fmuLocation>/resources/osmp_sensor.toml` when
//! present; otherwise built-in defaults apply.

pub mod api;
pub mod instance;
pub mod types;

// Re-exports
pub use api::*;
pub use instance::{FmuInstance, InstantiateArgs, CONFIG_FILE_NAME};
