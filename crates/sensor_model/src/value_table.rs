//! Scalar slots exchanged with the host.
//!
//! Batches are validated as a whole before any slot is read or written, so a
//! bad index never leaves a half-applied batch behind.

use contracts::{vr, ContractError, PayloadSlotSet, ValueKind};

/// Indexed boolean / integer / real / string slots
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    booleans: [bool; vr::BOOLEAN_VARS],
    integers: [i32; vr::INTEGER_VARS],
    reals: [f64; vr::REAL_VARS],
    strings: [String; vr::STRING_VARS],
}

impl Default for ValueTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Reject the batch if any reference is out of range or lengths differ
fn check_batch(kind: ValueKind, refs: &[u32], values: usize) -> Result<(), ContractError> {
    if refs.len() != values {
        return Err(ContractError::BatchLengthMismatch {
            kind,
            references: refs.len(),
            values,
        });
    }
    let capacity = kind.capacity();
    match refs.iter().find(|&&r| r as usize >= capacity) {
        Some(&bad) => Err(ContractError::out_of_range(kind, bad, capacity)),
        None => Ok(()),
    }
}

fn get_batch<T: Clone>(
    kind: ValueKind,
    slots: &[T],
    refs: &[u32],
    out: &mut [T],
) -> Result<(), ContractError> {
    check_batch(kind, refs, out.len())?;
    for (dst, &r) in out.iter_mut().zip(refs) {
        *dst = slots[r as usize].clone();
    }
    Ok(())
}

fn set_batch<T: Clone>(
    kind: ValueKind,
    slots: &mut [T],
    refs: &[u32],
    values: &[T],
) -> Result<(), ContractError> {
    check_batch(kind, refs, values.len())?;
    for (&r, value) in refs.iter().zip(values) {
        slots[r as usize] = value.clone();
    }
    Ok(())
}

impl ValueTable {
    /// All slots zeroed
    pub fn new() -> Self {
        Self {
            booleans: [false; vr::BOOLEAN_VARS],
            integers: [0; vr::INTEGER_VARS],
            reals: [0.0; vr::REAL_VARS],
            strings: std::array::from_fn(|_| String::new()),
        }
    }

    /// Zero every slot
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ===== Batch access (host side) =====

    pub fn get_booleans(&self, refs: &[u32], out: &mut [bool]) -> Result<(), ContractError> {
        get_batch(ValueKind::Boolean, &self.booleans, refs, out)
    }

    pub fn set_booleans(&mut self, refs: &[u32], values: &[bool]) -> Result<(), ContractError> {
        set_batch(ValueKind::Boolean, &mut self.booleans, refs, values)
    }

    pub fn get_integers(&self, refs: &[u32], out: &mut [i32]) -> Result<(), ContractError> {
        get_batch(ValueKind::Integer, &self.integers, refs, out)
    }

    pub fn set_integers(&mut self, refs: &[u32], values: &[i32]) -> Result<(), ContractError> {
        set_batch(ValueKind::Integer, &mut self.integers, refs, values)
    }

    pub fn get_reals(&self, refs: &[u32], out: &mut [f64]) -> Result<(), ContractError> {
        get_batch(ValueKind::Real, &self.reals, refs, out)
    }

    pub fn set_reals(&mut self, refs: &[u32], values: &[f64]) -> Result<(), ContractError> {
        set_batch(ValueKind::Real, &mut self.reals, refs, values)
    }

    /// Borrow string slots in batch order
    pub fn get_strings(&self, refs: &[u32]) -> Result<Vec<&str>, ContractError> {
        check_batch(ValueKind::String, refs, refs.len())?;
        Ok(refs
            .iter()
            .map(|&r| self.strings[r as usize].as_str())
            .collect())
    }

    pub fn set_strings<S: AsRef<str>>(
        &mut self,
        refs: &[u32],
        values: &[S],
    ) -> Result<(), ContractError> {
        check_batch(ValueKind::String, refs, values.len())?;
        for (&r, value) in refs.iter().zip(values) {
            self.strings[r as usize] = value.as_ref().to_owned();
        }
        Ok(())
    }

    // ===== Named slots (model side) =====

    pub fn source(&self) -> bool {
        self.booleans[vr::BOOLEAN_SOURCE as usize]
    }

    pub fn valid(&self) -> bool {
        self.booleans[vr::BOOLEAN_VALID as usize]
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.booleans[vr::BOOLEAN_VALID as usize] = valid;
    }

    pub fn count(&self) -> i32 {
        self.integers[vr::INTEGER_COUNT as usize]
    }

    pub fn set_count(&mut self, count: i32) {
        self.integers[vr::INTEGER_COUNT as usize] = count;
    }

    /// Inbound payload descriptor written by the host
    pub fn payload_in(&self) -> PayloadSlotSet {
        PayloadSlotSet {
            size: self.integers[vr::INTEGER_SENSORDATA_IN_SIZE as usize],
            address_high: self.integers[vr::INTEGER_SENSORDATA_IN_BASEHI as usize],
            address_low: self.integers[vr::INTEGER_SENSORDATA_IN_BASELO as usize],
        }
    }

    /// Outbound payload descriptor read by the host
    pub fn payload_out(&self) -> PayloadSlotSet {
        PayloadSlotSet {
            size: self.integers[vr::INTEGER_SENSORDATA_OUT_SIZE as usize],
            address_high: self.integers[vr::INTEGER_SENSORDATA_OUT_BASEHI as usize],
            address_low: self.integers[vr::INTEGER_SENSORDATA_OUT_BASELO as usize],
        }
    }

    pub fn set_payload_out(&mut self, slots: PayloadSlotSet) {
        self.integers[vr::INTEGER_SENSORDATA_OUT_SIZE as usize] = slots.size;
        self.integers[vr::INTEGER_SENSORDATA_OUT_BASEHI as usize] = slots.address_high;
        self.integers[vr::INTEGER_SENSORDATA_OUT_BASELO as usize] = slots.address_low;
    }
}
