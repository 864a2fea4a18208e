//! # OSI Wire
//!
//! Serialize / parse pair for the structured payload exchanged with the host.
//! The sensor model treats the byte layout as opaque; this crate owns it.
//!
//! ## Usage Example
//!
//! ```
//! use contracts::DetectionRecord;
//! use osi_wire::{decode_detection_record, encode_detection_record};
//!
//! let record = DetectionRecord { ego_vehicle_id: 4, ..Default::default() };
//! let bytes = encode_detection_record(&record);
//! let parsed = decode_detection_record(&bytes).unwrap();
//! assert_eq!(parsed.ego_vehicle_id, 4);
//! ```

mod convert;
pub mod proto;

use bytes::Bytes;
use contracts::{ContractError, DetectionRecord};
use prost::Message;

pub use proto::SensorData;

/// Serialize a record to a fresh buffer
pub fn encode_detection_record(record: &DetectionRecord) -> Bytes {
    Bytes::from(SensorData::from(record).encode_to_vec())
}

/// Parse a record from raw payload bytes
///
/// # Errors
/// Returns `PayloadDecode` when the bytes are not a valid `SensorData` message.
pub fn decode_detection_record(bytes: &[u8]) -> Result<DetectionRecord, ContractError> {
    SensorData::decode(bytes)
        .map(DetectionRecord::from)
        .map_err(|e| ContractError::payload_decode(bytes.len(), e.to_string()))
}
