use thiserror::Error;
use winnow::error::{ContextError, ErrMode};

/// Failure to decode a value from bytes.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum DeserializeError {
    /// The input ended before the value was complete.
    #[error("input ended early at offset {offset}")]
    Truncated {
        /// How far into the input decoding got.
        offset: usize,
    },

    /// The value decoded, but did not account for all of the input.
    #[error("{remaining} trailing bytes after a complete value")]
    TrailingBytes {
        /// How many bytes were left over.
        remaining: usize,
    },

    /// The input is not the canonical encoding of any value of this type.
    #[error("malformed input at offset {offset}: {reason}")]
    Malformed {
        /// Where the offending token starts.
        offset: usize,
        /// What was wrong with it.
        reason: Malformed,
    },
}

impl DeserializeError {
    /// Classifies a parser failure that stopped at `offset`.
    ///
    /// Only failures raised through [`malformed`](crate::malformed) carry a
    /// [`Malformed`] cause; everything else came from running out of input.
    pub fn from_parser(err: ErrMode<ContextError>, offset: usize) -> Self {
        let inner = match err {
            ErrMode::Incomplete(_) => return Self::Truncated { offset },
            ErrMode::Backtrack(e) | ErrMode::Cut(e) => e,
        };
        match inner
            .cause()
            .and_then(|cause| cause.downcast_ref::<Malformed>())
        {
            Some(reason) => Self::Malformed {
                offset,
                reason: reason.clone(),
            },
            None => Self::Truncated { offset },
        }
    }

    /// Returns the malformation reason, if this is one.
    pub fn malformed(&self) -> Option<&Malformed> {
        match self {
            Self::Malformed { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Why a piece of input was rejected as non-canonical.
#[derive(Clone, Debug, Eq, Error, Hash, PartialEq)]
pub enum Malformed {
    /// A ULEB128 integer had a redundant trailing zero group.
    #[error("non-canonical ULEB128 encoding")]
    NonCanonicalUleb128,

    /// A ULEB128 integer did not fit in a `u32`.
    #[error("ULEB128 value overflows u32")]
    Uleb128Overflow,

    /// A sequence length exceeded the largest length either format allows.
    #[error("sequence length {len} exceeds maximum {max}")]
    LengthTooLarge {
        /// The length found in the input.
        len: u32,
        /// The largest allowed length.
        max: u32,
    },

    /// An enum variant index named no variant.
    #[error("unknown variant index {index} for {type_name}")]
    UnknownVariant {
        /// The enum being decoded.
        type_name: &'static str,
        /// The index found in the input.
        index: u32,
    },

    /// A `bool` byte other than `0` or `1`.
    #[error("invalid bool byte {0:#04x}")]
    InvalidBool(u8),

    /// An `Option` tag byte other than `0` or `1`.
    #[error("invalid option tag {0:#04x}")]
    InvalidOptionTag(u8),

    /// String bytes were not UTF-8.
    #[error("string is not valid UTF-8")]
    InvalidUtf8,

    /// Map keys were not strictly increasing by their encoded bytes.
    #[error("map keys are not in canonical order")]
    UnsortedMapKeys,

    /// A fixed-size byte field had the wrong length prefix.
    #[error("expected {expected} bytes, found {actual}")]
    InvalidLength {
        /// The length the field must have.
        expected: usize,
        /// The length found in the input.
        actual: usize,
    },

    /// An identifier contained characters Move does not allow.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),

    /// Recursive types nested deeper than the limit.
    #[error("container depth exceeds {0}")]
    DepthLimitExceeded(usize),
}
