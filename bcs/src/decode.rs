use std::collections::BTreeMap;

use winnow::{
    binary::{le_u128, le_u16, le_u32, le_u64},
    error::{ContextError, ErrorKind, FromExternalError},
    stream::Stream as _,
    token::{any, take},
    Parser as _,
};

use crate::{Format, Malformed};

/// A single place to swap out the error type if required.
pub type PResult<T> = winnow::PResult<T, ContextError>;

/// A value that can be read back from its canonical encoding.
///
/// Implementations consume exactly the bytes [`Encode`](crate::Encode)
/// would have produced for the value, and leave the rest of `input` alone.
pub trait Decode: Sized {
    /// Reads one value from the front of `input`.
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self>;
}

/// Fails the parser with `reason`, so that it surfaces as
/// [`DeserializeError::Malformed`](crate::DeserializeError::Malformed).
///
/// Callers should reset `input` to the start of the offending token first.
pub fn malformed<T>(input: &mut &[u8], reason: Malformed) -> PResult<T> {
    Err(FromExternalError::from_external_error(
        input,
        ErrorKind::Verify,
        reason,
    ))
}

/// Fails the parser for an enum index that names no variant.
pub fn unknown_variant<T>(input: &mut &[u8], type_name: &'static str, index: u32) -> PResult<T> {
    malformed(input, Malformed::UnknownVariant { type_name, index })
}

/// Reads a length-prefixed byte string that must be exactly `N` bytes long.
pub fn read_sized_bytes<F: Format, const N: usize>(input: &mut &[u8]) -> PResult<[u8; N]> {
    let start = input.checkpoint();
    let len = F::read_length(input)?;
    if len != N {
        input.reset(&start);
        return malformed(
            input,
            Malformed::InvalidLength {
                expected: N,
                actual: len,
            },
        );
    }
    array(input)
}

pub(crate) fn byte(input: &mut &[u8]) -> PResult<u8> {
    any(input)
}

fn bytes<'i>(input: &mut &'i [u8], len: usize) -> PResult<&'i [u8]> {
    take(len).parse_next(input)
}

fn array<const N: usize>(input: &mut &[u8]) -> PResult<[u8; N]> {
    bytes(input, N).map(|it| it.try_into().expect("take has already selected N bytes"))
}

impl Decode for bool {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        let start = input.checkpoint();
        match byte(input)? {
            0 => Ok(false),
            1 => Ok(true),
            other => {
                input.reset(&start);
                malformed(input, Malformed::InvalidBool(other))
            }
        }
    }
}

impl Decode for u8 {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        byte(input)
    }
}

macro_rules! decode_le {
    ($($ty:ty => $parser:ident),* $(,)?) => {
        $(
            impl Decode for $ty {
                fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
                    $parser(input)
                }
            }
        )*
    };
}

decode_le! {
    u16 => le_u16,
    u32 => le_u32,
    u64 => le_u64,
    u128 => le_u128,
}

impl<const N: usize> Decode for [u8; N] {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        array(input)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        let len = F::read_length(input)?;
        // every element takes at least one byte, so don't trust `len` further
        // than the input could possibly go
        let mut out = Vec::with_capacity(len.min(input.len()));
        for _ in 0..len {
            out.push(T::decode::<F>(input)?);
        }
        Ok(out)
    }
}

impl Decode for String {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        let start = input.checkpoint();
        let len = F::read_length(input)?;
        let raw = bytes(input, len)?;
        match std::str::from_utf8(raw) {
            Ok(s) => Ok(s.to_owned()),
            Err(_) => {
                input.reset(&start);
                malformed(input, Malformed::InvalidUtf8)
            }
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        let start = input.checkpoint();
        match byte(input)? {
            0 => Ok(None),
            1 => T::decode::<F>(input).map(Some),
            other => {
                input.reset(&start);
                malformed(input, Malformed::InvalidOptionTag(other))
            }
        }
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        T::decode::<F>(input).map(Box::new)
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        Ok((A::decode::<F>(input)?, B::decode::<F>(input)?))
    }
}

impl<A: Decode, B: Decode, C: Decode> Decode for (A, B, C) {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        Ok((
            A::decode::<F>(input)?,
            B::decode::<F>(input)?,
            C::decode::<F>(input)?,
        ))
    }
}

/// Keys must appear in strictly increasing order of their encoded bytes,
/// which also rules out duplicates.
impl<K: Decode + Ord, V: Decode> Decode for BTreeMap<K, V> {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        let len = F::read_length(input)?;
        let mut out = BTreeMap::new();
        let mut previous: Option<&[u8]> = None;
        for _ in 0..len {
            let key_start = *input;
            let key = K::decode::<F>(input)?;
            let key_bytes = &key_start[..key_start.len() - input.len()];
            if previous.is_some_and(|previous| previous >= key_bytes) {
                *input = key_start;
                return malformed(input, Malformed::UnsortedMapKeys);
            }
            previous = Some(key_bytes);
            out.insert(key, V::decode::<F>(input)?);
        }
        Ok(out)
    }
}
