//! # Sensor Model
//!
//! Dummy object-list sensor exchanging serialized `SensorData` with a
//! co-simulation host through integer slots.
//!
//! Each step:
//! - acts as ground-truth source (synthesized scenario), or
//! - decodes the inbound payload, keeps the vehicles in range and in the
//!   forward cone of the ego vehicle, and publishes them as detections
//!
//! Published payloads are kept alive for one further step so the host can
//! read them after the step returns.
//!
//! ## Example
//!
//! ```ignore
//! use sensor_model::SensorModel;
//!
//! let mut model = SensorModel::default();
//! model.start(0.0);
//! model.do_step(0.0, 0.1, true);
//!
//! let out = model.value_table().payload_out();
//! ```

pub mod address;
pub mod fusion;
mod model;
mod payload_store;
mod synthesizer;
mod value_table;

// Re-exports
pub use address::{Address, AddressWidth};
pub use fusion::FusionEngine;
pub use model::SensorModel;
pub use observability::StepMode;
pub use payload_store::PublishedPayloadStore;
pub use synthesizer::ScenarioSynthesizer;
pub use value_table::ValueTable;
