//! In-process co-simulation host.

mod cosim;
mod stats;

pub use cosim::{CoSimulation, StepReport};
pub use stats::RunStats;
