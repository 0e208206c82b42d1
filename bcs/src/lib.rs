//! Binary canonical serialization for the Diem wire format.
//!
//! Every transaction the network accepts is signed over its BCS encoding, so
//! this crate has exactly one job: turn a value into bytes the same way the
//! network does, and turn bytes back into a value only if they are in the one
//! canonical form that value has.
//!
//! Two [`Format`]s share the same traits:
//! - [`Bcs`], the current format: ULEB128 lengths and variant indices.
//! - [`Lcs`], the legacy format that older account-state blobs are written
//!   in: little-endian `u32` lengths and variant indices.
//!
//! Values implement [`Encode`] and [`Decode`], usually through the derive
//! macros re-exported from this crate:
//!
//! ```
//! use diem_bcs::{Decode, Encode};
//!
//! #[derive(Debug, PartialEq, Encode, Decode)]
//! struct Payment {
//!     amount: u64,
//!     memo: Option<String>,
//! }
//!
//! let payment = Payment { amount: 5, memo: None };
//! let bytes = diem_bcs::to_bytes(&payment);
//! assert_eq!(bytes, [5, 0, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(diem_bcs::from_bytes::<Payment>(&bytes).unwrap(), payment);
//! ```
//!
//! Decoders are [`winnow`] parsers over `&[u8]`. A decoder that runs out of
//! input reports [`DeserializeError::Truncated`]; a decoder that finds bytes
//! which could never have been produced by [`Encode`] reports
//! [`DeserializeError::Malformed`] with the specific [`Malformed`] reason.

#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]

// Lets the derive macros refer to `::diem_bcs` from inside this crate too.
extern crate self as diem_bcs;

mod decode;
mod encode;
mod error;
mod format;
pub mod uleb128;

pub use decode::{malformed, read_sized_bytes, unknown_variant, Decode, PResult};
pub use diem_bcs_derive::{Decode, Encode};
pub use encode::{write_bytes, Encode};
pub use error::{DeserializeError, Malformed};
pub use format::{Bcs, Format, Lcs};

/// The largest sequence length either format will write or accept.
pub const MAX_SEQUENCE_LENGTH: u32 = (1 << 31) - 1;

/// How deeply recursive types (such as nested type tags) may nest.
pub const MAX_CONTAINER_DEPTH: usize = 500;

/// Encodes `value` with the given format.
pub fn serialize<F: Format, T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value.encode::<F>(&mut out);
    out
}

/// Decodes a value from the start of `bytes`, returning it along with
/// whatever input was left over.
pub fn deserialize_prefix<F: Format, T: Decode>(
    bytes: &[u8],
) -> Result<(T, &[u8]), DeserializeError> {
    let mut input = bytes;
    match T::decode::<F>(&mut input) {
        Ok(value) => Ok((value, input)),
        Err(e) => {
            let err = DeserializeError::from_parser(e, bytes.len() - input.len());
            log::trace!(
                "{} decode of {} failed: {err}",
                F::NAME,
                std::any::type_name::<T>()
            );
            Err(err)
        }
    }
}

/// Decodes a value that must span all of `bytes`.
pub fn deserialize<F: Format, T: Decode>(bytes: &[u8]) -> Result<T, DeserializeError> {
    let (value, rest) = deserialize_prefix::<F, T>(bytes)?;
    match rest.is_empty() {
        true => Ok(value),
        false => Err(DeserializeError::TrailingBytes {
            remaining: rest.len(),
        }),
    }
}

/// Encodes `value` as BCS.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    serialize::<Bcs, T>(value)
}

/// Decodes a BCS value that must span all of `bytes`.
pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T, DeserializeError> {
    deserialize::<Bcs, T>(bytes)
}

/// Entry points for the legacy LCS format.
pub mod lcs {
    use crate::{DeserializeError, Decode, Encode, Lcs};

    /// Encodes `value` as LCS.
    pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
        crate::serialize::<Lcs, T>(value)
    }

    /// Decodes an LCS value that must span all of `bytes`.
    pub fn from_bytes<T: Decode>(bytes: &[u8]) -> Result<T, DeserializeError> {
        crate::deserialize::<Lcs, T>(bytes)
    }
}
