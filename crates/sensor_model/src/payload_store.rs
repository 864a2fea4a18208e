//! Two-generation outbound payload store.
//!
//! Owns exactly two buffers. Each publish serializes into the buffer that is
//! *not* currently exposed, so the address handed out by publish N stays
//! valid (unmodified, unfreed) until publish N+1 has completed. Publish N+2
//! reuses that buffer.

use std::fmt;

use bytes::BytesMut;
use contracts::{ContractError, PayloadSlotSet};
use prost::Message;
use tracing::debug;

use crate::address::Address;

/// Double buffer for published payloads
pub struct PublishedPayloadStore {
    buffers: [BytesMut; 2],
    /// Index of the buffer whose address was handed out last
    exposed: Option<usize>,
    publish_count: u64,
}

impl fmt::Debug for PublishedPayloadStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublishedPayloadStore")
            .field("exposed", &self.exposed)
            .field("exposed_len", &self.exposed_bytes().map(<[u8]>::len))
            .field("publish_count", &self.publish_count)
            .finish()
    }
}

impl Default for PublishedPayloadStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishedPayloadStore {
    pub fn new() -> Self {
        Self {
            buffers: [BytesMut::new(), BytesMut::new()],
            exposed: None,
            publish_count: 0,
        }
    }

    /// Serialize `message` and expose it
    ///
    /// The previously exposed buffer is left untouched.
    ///
    /// # Errors
    /// `PayloadEncode` if the message does not fit a 32-bit size slot.
    pub fn publish<M: Message>(&mut self, message: &M) -> Result<PayloadSlotSet, ContractError> {
        let len = message.encoded_len();
        let size = i32::try_from(len).map_err(|_| ContractError::PayloadEncode {
            message: format!("payload of {len} bytes exceeds the size slot"),
        })?;

        let target = match self.exposed {
            Some(idx) => 1 - idx,
            None => 0,
        };

        let buffer = &mut self.buffers[target];
        buffer.clear();
        buffer.reserve(len);
        message
            .encode(buffer)
            .map_err(|e| ContractError::PayloadEncode {
                message: e.to_string(),
            })?;

        self.exposed = Some(target);
        self.publish_count += 1;

        if size == 0 {
            return Ok(PayloadSlotSet::EMPTY);
        }

        let address = Address::from_ptr(self.buffers[target].as_ptr());
        let (address_high, address_low) = address.encode();

        debug!(
            addr_hi = format_args!("{:08X}", address_high),
            addr_lo = format_args!("{:08X}", address_low),
            %address,
            size,
            "providing payload"
        );

        Ok(PayloadSlotSet {
            size,
            address_high,
            address_low,
        })
    }

    /// Slot set for "no output this step"
    ///
    /// Buffers are kept; a host still reading the last address stays safe.
    pub fn reset(&self) -> PayloadSlotSet {
        PayloadSlotSet::EMPTY
    }

    /// Drop both generations (instance reset / teardown)
    pub fn release(&mut self) {
        self.buffers = [BytesMut::new(), BytesMut::new()];
        self.exposed = None;
    }

    /// Bytes of the most recently exposed payload
    pub fn exposed_bytes(&self) -> Option<&[u8]> {
        self.exposed.map(|idx| &self.buffers[idx][..])
    }

    /// Bytes of the generation published before the exposed one
    pub fn previous_bytes(&self) -> Option<&[u8]> {
        match self.exposed {
            Some(idx) if self.publish_count >= 2 => Some(&self.buffers[1 - idx][..]),
            _ => None,
        }
    }

    /// Number of successful publishes since creation
    pub fn publish_count(&self) -> u64 {
        self.publish_count
    }
}
