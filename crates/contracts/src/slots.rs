//! Scalar slot layout exposed to the host
//!
//! The host only exchanges fixed-width scalars, so payloads travel as a
//! `(size, address_high, address_low)` triple of integer slots.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value references (slot indices) per scalar kind
pub mod vr {
    /// Host forces ground-truth source mode
    pub const BOOLEAN_SOURCE: u32 = 0;
    /// Output payload is valid for this step
    pub const BOOLEAN_VALID: u32 = 1;
    pub const BOOLEAN_VARS: usize = 2;

    pub const INTEGER_SENSORDATA_IN_BASELO: u32 = 0;
    pub const INTEGER_SENSORDATA_IN_BASEHI: u32 = 1;
    pub const INTEGER_SENSORDATA_IN_SIZE: u32 = 2;
    pub const INTEGER_SENSORDATA_OUT_BASELO: u32 = 3;
    pub const INTEGER_SENSORDATA_OUT_BASEHI: u32 = 4;
    pub const INTEGER_SENSORDATA_OUT_SIZE: u32 = 5;
    /// Number of detections (or vehicles, in source mode)
    pub const INTEGER_COUNT: u32 = 6;
    pub const INTEGER_VARS: usize = 7;

    pub const REAL_VARS: usize = 1;
    pub const STRING_VARS: usize = 1;
}

/// Scalar kinds held by the value table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Boolean,
    Integer,
    Real,
    String,
}

impl ValueKind {
    /// Declared number of slots for this kind
    pub const fn capacity(self) -> usize {
        match self {
            Self::Boolean => vr::BOOLEAN_VARS,
            Self::Integer => vr::INTEGER_VARS,
            Self::Real => vr::REAL_VARS,
            Self::String => vr::STRING_VARS,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Real => "real",
            Self::String => "string",
        };
        f.write_str(name)
    }
}

/// Outbound (or inbound) payload descriptor
///
/// `size == 0` means "no payload"; the address fields are then zero and must
/// not be dereferenced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadSlotSet {
    pub size: i32,
    pub address_high: i32,
    pub address_low: i32,
}

impl PayloadSlotSet {
    pub const EMPTY: Self = Self {
        size: 0,
        address_high: 0,
        address_low: 0,
    };

    /// Whether a payload is present
    #[inline]
    pub fn is_present(&self) -> bool {
        self.size > 0
    }
}

/// Step / call status, numerically identical to FMI 1.0 `fmiStatus`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum StepStatus {
    Ok = 0,
    Warning = 1,
    Discard = 2,
    Error = 3,
    Fatal = 4,
    Pending = 5,
}

impl StepStatus {
    #[inline]
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }
}
