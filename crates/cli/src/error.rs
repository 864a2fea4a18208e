//! Error types for host-side operations.

use contracts::{ContractError, StepStatus};
use thiserror::Error;

/// Host harness errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// An instance returned a non-OK status from a step
    #[error("{instance} step at t={time} returned {status:?}")]
    StepFailed {
        instance: &'static str,
        time: f64,
        status: StepStatus,
    },

    /// The published slots did not describe a readable payload
    #[error("{instance} published an unreadable payload: {message}")]
    Payload {
        instance: &'static str,
        message: String,
    },

    /// Slot access or payload decoding rejected by the model
    #[error(transparent)]
    Contract(#[from] ContractError),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn payload(instance: &'static str, message: impl Into<String>) -> Self {
        Self::Payload {
            instance,
            message: message.into(),
        }
    }
}

/// Result type alias for host operations
pub type Result<T> = std::result::Result<T, CliError>;
