//! Address <-> integer pair codec
//!
//! The host interface only carries 32-bit integers, so a buffer address is
//! split into `(high, low)`. On 32-bit targets `high` is always 0.

use std::fmt;

/// Width of a native address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressWidth {
    W32,
    W64,
}

impl AddressWidth {
    /// Width of the running target
    pub const NATIVE: Self = if cfg!(target_pointer_width = "64") {
        Self::W64
    } else {
        Self::W32
    };
}

/// Opaque in-process memory address
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Address(usize);

impl Address {
    pub const NULL: Self = Self(0);

    #[inline]
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        Self(ptr as usize)
    }

    #[inline]
    pub fn as_ptr(self) -> *const u8 {
        self.0 as *const u8
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    /// Split into `(high, low)` for the native width
    #[inline]
    pub fn encode(self) -> (i32, i32) {
        encode_with(AddressWidth::NATIVE, self.0 as u64)
    }

    /// Rebuild from `(high, low)` for the native width
    #[inline]
    pub fn decode(high: i32, low: i32) -> Self {
        // Lossless: a native-width decode never exceeds usize
        Self(decode_with(AddressWidth::NATIVE, high, low) as usize)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({:#x})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Split a raw address value for the given width
///
/// Bits are reinterpreted, not converted: `low` carries bits 0..32 and `high`
/// bits 32..64 as signed integers.
pub fn encode_with(width: AddressWidth, raw: u64) -> (i32, i32) {
    match width {
        AddressWidth::W64 => ((raw >> 32) as u32 as i32, raw as u32 as i32),
        AddressWidth::W32 => (0, raw as u32 as i32),
    }
}

/// Join `(high, low)` back into a raw address value for the given width
pub fn decode_with(width: AddressWidth, high: i32, low: i32) -> u64 {
    match width {
        AddressWidth::W64 => ((high as u32 as u64) << 32) | (low as u32 as u64),
        AddressWidth::W32 => low as u32 as u64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_split_64() {
        let (hi, lo) = encode_with(AddressWidth::W64, 0x0000_7fff_dead_beef);
        assert_eq!(hi, 0x7fff);
        assert_eq!(lo as u32, 0xdead_beef);
        assert!(lo < 0, "low half is reinterpreted as signed");
    }

    #[test]
    fn test_32_bit_high_is_zero() {
        let (hi, lo) = encode_with(AddressWidth::W32, 0x8000_1000);
        assert_eq!(hi, 0);
        assert_eq!(decode_with(AddressWidth::W32, hi, lo), 0x8000_1000);
    }

    #[test]
    fn test_native_round_trip_of_live_allocation() {
        let buffer = vec![1u8, 2, 3];
        let addr = Address::from_ptr(buffer.as_ptr());
        let (hi, lo) = addr.encode();
        let decoded = Address::decode(hi, lo);
        assert_eq!(decoded, addr);
        assert_eq!(decoded.as_ptr(), buffer.as_ptr());
    }

    #[test]
    fn test_null_round_trip() {
        assert_eq!(Address::NULL.encode(), (0, 0));
        assert!(Address::decode(0, 0).is_null());
    }

    proptest! {
        #[test]
        fn prop_round_trip_64(raw in any::<u64>()) {
            let (hi, lo) = encode_with(AddressWidth::W64, raw);
            prop_assert_eq!(decode_with(AddressWidth::W64, hi, lo), raw);
        }

        #[test]
        fn prop_round_trip_32(raw in any::<u32>()) {
            let (hi, lo) = encode_with(AddressWidth::W32, raw as u64);
            prop_assert_eq!(hi, 0);
            prop_assert_eq!(decode_with(AddressWidth::W32, hi, lo), raw as u64);
        }
    }
}
