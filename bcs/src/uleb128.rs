//! Unsigned LEB128, restricted to the canonical encodings of `u32` values.
//!
//! Each byte carries seven bits of the value, least significant group first,
//! with the high bit set on every byte but the last. A value has exactly one
//! canonical encoding: the shortest one. Decoding rejects anything else.

use winnow::stream::Stream as _;

use crate::{decode::byte, malformed, Malformed, PResult};

/// Appends the canonical encoding of `value`.
pub fn write_u32(out: &mut Vec<u8>, mut value: u32) {
    while value >= 0x80 {
        out.push((value & 0x7f) as u8 | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Reads a canonically encoded `u32`.
///
/// On a malformed encoding the input is left at the first byte of the
/// integer.
pub fn read_u32(input: &mut &[u8]) -> PResult<u32> {
    let start = input.checkpoint();
    let mut value = 0u64;
    // a u32 needs at most five groups
    for shift in (0..35).step_by(7) {
        let b = byte(input)?;
        let digit = b & 0x7f;
        value |= u64::from(digit) << shift;
        if b & 0x80 == 0 {
            if shift > 0 && digit == 0 {
                input.reset(&start);
                return malformed(input, Malformed::NonCanonicalUleb128);
            }
            return match u32::try_from(value) {
                Ok(value) => Ok(value),
                Err(_) => {
                    input.reset(&start);
                    malformed(input, Malformed::Uleb128Overflow)
                }
            };
        }
    }
    input.reset(&start);
    malformed(input, Malformed::Uleb128Overflow)
}
