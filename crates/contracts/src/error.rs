//! Layered error definitions
//!
//! Categorized by source: config / value table / payload / ffi

use thiserror::Error;

use crate::ValueKind;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Value Table Errors =====
    /// Value reference beyond the declared capacity of its kind
    #[error("{kind} value reference {index} out of range (capacity {capacity})")]
    ValueReferenceOutOfRange {
        kind: ValueKind,
        index: u32,
        capacity: usize,
    },

    /// Index and value slices of a batch differ in length
    #[error("{kind} batch length mismatch: {references} references, {values} values")]
    BatchLengthMismatch {
        kind: ValueKind,
        references: usize,
        values: usize,
    },

    // ===== Payload Errors =====
    /// Inbound payload does not conform to the wire schema
    #[error("payload decode error ({size} bytes): {message}")]
    PayloadDecode { size: usize, message: String },

    /// Outbound record could not be serialized
    #[error("payload encode error: {message}")]
    PayloadEncode { message: String },

    // ===== FFI Errors =====
    /// FFI call error
    #[error("ffi error: {message}")]
    Ffi { message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create out-of-range value reference error
    pub fn out_of_range(kind: ValueKind, index: u32, capacity: usize) -> Self {
        Self::ValueReferenceOutOfRange {
            kind,
            index,
            capacity,
        }
    }

    /// Create payload decode error
    pub fn payload_decode(size: usize, message: impl Into<String>) -> Self {
        Self::PayloadDecode {
            size,
            message: message.into(),
        }
    }

    /// Create ffi error
    pub fn ffi(message: impl Into<String>) -> Self {
        Self::Ffi {
            message: message.into(),
        }
    }
}
