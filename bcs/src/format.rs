use winnow::{binary::le_u32, stream::Stream as _};

use crate::{malformed, uleb128, Malformed, PResult, MAX_SEQUENCE_LENGTH};

/// How sequence lengths and enum variant indices are written.
///
/// Everything else (integers, bools, options, field order) is shared by
/// both formats.
pub trait Format: 'static {
    /// Human readable name, used in log output.
    const NAME: &'static str;

    /// Writes a length or variant index.
    fn write_prefix(out: &mut Vec<u8>, value: u32);

    /// Reads a length or variant index.
    fn read_prefix(input: &mut &[u8]) -> PResult<u32>;

    /// Writes a sequence length.
    ///
    /// # Panics
    /// - If `len` exceeds [`MAX_SEQUENCE_LENGTH`]. No value this crate can
    ///   decode is that large, so encoding one is a caller bug.
    fn write_length(out: &mut Vec<u8>, len: usize) {
        assert!(
            len <= MAX_SEQUENCE_LENGTH as usize,
            "sequence of length {len} is too long to encode"
        );
        Self::write_prefix(out, len as u32)
    }

    /// Reads a sequence length, rejecting anything above
    /// [`MAX_SEQUENCE_LENGTH`].
    fn read_length(input: &mut &[u8]) -> PResult<usize> {
        let start = input.checkpoint();
        let len = Self::read_prefix(input)?;
        if len > MAX_SEQUENCE_LENGTH {
            input.reset(&start);
            return malformed(
                input,
                Malformed::LengthTooLarge {
                    len,
                    max: MAX_SEQUENCE_LENGTH,
                },
            );
        }
        Ok(len as usize)
    }

    /// Writes the index of an enum variant.
    fn write_variant_index(out: &mut Vec<u8>, index: u32) {
        Self::write_prefix(out, index)
    }

    /// Reads the index of an enum variant.
    fn read_variant_index(input: &mut &[u8]) -> PResult<u32> {
        Self::read_prefix(input)
    }
}

/// Binary canonical serialization: ULEB128 prefixes.
#[derive(Debug)]
pub enum Bcs {}

impl Format for Bcs {
    const NAME: &'static str = "BCS";

    fn write_prefix(out: &mut Vec<u8>, value: u32) {
        uleb128::write_u32(out, value)
    }

    fn read_prefix(input: &mut &[u8]) -> PResult<u32> {
        uleb128::read_u32(input)
    }
}

/// The legacy canonical serialization: fixed-width little-endian `u32`
/// prefixes.
#[derive(Debug)]
pub enum Lcs {}

impl Format for Lcs {
    const NAME: &'static str = "LCS";

    fn write_prefix(out: &mut Vec<u8>, value: u32) {
        out.extend_from_slice(&value.to_le_bytes())
    }

    fn read_prefix(input: &mut &[u8]) -> PResult<u32> {
        le_u32(input)
    }
}
