//! # Contracts
//!
//! Frozen interface contracts shared by every crate of the sensor model:
//! scene and detection records, the scalar slot layout the host sees, the
//! model configuration and the unified error type.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Frames
//! - Scene records are expressed in the global (world) frame
//! - Detected objects carry absolute positions; relative geometry is only used for gating

mod config;
mod detection;
mod error;
mod scene;
mod slots;

pub use config::*;
pub use detection::*;
pub use error::*;
pub use scene::*;
pub use slots::*;
