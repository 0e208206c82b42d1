//! Move type tags, and the currency codes that name them.

use std::fmt;

use diem_bcs::{malformed, unknown_variant, Decode, Encode, Format, Malformed, PResult};
use thiserror::Error;

use crate::AccountAddress;

/// A Move identifier: `[A-Za-z][A-Za-z0-9_]*`, or `_` followed by at least
/// one more of those characters.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Validates and wraps `s`.
    pub fn new(s: impl Into<String>) -> Result<Self, TypeTagError> {
        let s = s.into();
        match is_valid_identifier(&s) {
            true => Ok(Self(s)),
            false => Err(TypeTagError::InvalidIdentifier(s)),
        }
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let valid_rest = |c: char| c.is_ascii_alphanumeric() || c == '_';
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => chars.all(valid_rest),
        Some('_') => s.len() > 1 && chars.all(valid_rest),
        _ => false,
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Encode for Identifier {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        self.0.encode::<F>(out)
    }
}

impl Decode for Identifier {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        let start = *input;
        let s = String::decode::<F>(input)?;
        match is_valid_identifier(&s) {
            true => Ok(Self(s)),
            false => {
                *input = start;
                malformed(input, Malformed::InvalidIdentifier(s))
            }
        }
    }
}

/// A published module: the account it lives under and its name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct ModuleId {
    /// The publishing account.
    pub address: AccountAddress,
    /// The module name.
    pub name: Identifier,
}

/// A fully qualified struct type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode)]
pub struct StructTag {
    /// The account the declaring module is published under.
    pub address: AccountAddress,
    /// The declaring module.
    pub module: Identifier,
    /// The struct name.
    pub name: Identifier,
    /// Type arguments, for generic structs.
    pub type_params: Vec<TypeTag>,
}

/// A Move type, as passed in transaction type arguments and event types.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode)]
pub enum TypeTag {
    Bool,
    U8,
    U64,
    U128,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(StructTag),
}

/// An error converting between currency codes and type tags.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TypeTagError {
    /// The code is empty or not ASCII.
    #[error("unknown currency code {0:?}")]
    UnknownCurrencyCode(String),

    /// The type tag does not name a currency.
    #[error("type tag {0} is not a currency")]
    UnknownTypeTag(String),

    /// The text is not a valid Move identifier.
    #[error("invalid identifier {0:?}")]
    InvalidIdentifier(String),
}

impl TypeTag {
    /// The tag of the currency with the given code, such as `XUS`: the struct
    /// `0x1::XUS::XUS`.
    ///
    /// Any non-empty ASCII code is accepted. Codes that are not Move
    /// identifiers still round-trip through [`TypeTag::to_currency_code`], but
    /// the network will not decode them.
    pub fn from_currency_code(code: &str) -> Result<Self, TypeTagError> {
        if code.is_empty() || !code.is_ascii() {
            return Err(TypeTagError::UnknownCurrencyCode(code.to_owned()));
        }
        let ident = Identifier(code.to_owned());
        Ok(Self::Struct(StructTag {
            address: AccountAddress::CORE_CODE,
            module: ident.clone(),
            name: ident,
            type_params: vec![],
        }))
    }

    /// The inverse of [`TypeTag::from_currency_code`]. Any other tag is an
    /// error.
    pub fn to_currency_code(&self) -> Result<String, TypeTagError> {
        match self {
            Self::Struct(StructTag {
                address,
                module,
                name,
                type_params,
            }) if *address == AccountAddress::CORE_CODE
                && module == name
                && type_params.is_empty() =>
            {
                Ok(name.0.clone())
            }
            other => Err(TypeTagError::UnknownTypeTag(other.to_string())),
        }
    }

    fn decode_at_depth<F: Format>(input: &mut &[u8], depth: usize) -> PResult<Self> {
        if depth > diem_bcs::MAX_CONTAINER_DEPTH {
            return malformed(
                input,
                Malformed::DepthLimitExceeded(diem_bcs::MAX_CONTAINER_DEPTH),
            );
        }
        let start = *input;
        Ok(match F::read_variant_index(input)? {
            0 => Self::Bool,
            1 => Self::U8,
            2 => Self::U64,
            3 => Self::U128,
            4 => Self::Address,
            5 => Self::Signer,
            6 => Self::Vector(Box::new(Self::decode_at_depth::<F>(input, depth + 1)?)),
            7 => Self::Struct(StructTag::decode_at_depth::<F>(input, depth + 1)?),
            index => {
                *input = start;
                return unknown_variant(input, "TypeTag", index);
            }
        })
    }
}

impl StructTag {
    fn decode_at_depth<F: Format>(input: &mut &[u8], depth: usize) -> PResult<Self> {
        let address = AccountAddress::decode::<F>(input)?;
        let module = Identifier::decode::<F>(input)?;
        let name = Identifier::decode::<F>(input)?;
        let len = F::read_length(input)?;
        let mut type_params = Vec::with_capacity(len.min(input.len()));
        for _ in 0..len {
            type_params.push(TypeTag::decode_at_depth::<F>(input, depth + 1)?);
        }
        Ok(Self {
            address,
            module,
            name,
            type_params,
        })
    }
}

/// Type tags nest at most [`MAX_CONTAINER_DEPTH`](diem_bcs::MAX_CONTAINER_DEPTH)
/// deep.
impl Decode for TypeTag {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        Self::decode_at_depth::<F>(input, 0)
    }
}

impl Decode for StructTag {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        Self::decode_at_depth::<F>(input, 0)
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}::{}::{}", self.address, self.module, self.name)?;
        if let Some((first, rest)) = self.type_params.split_first() {
            write!(f, "<{first}")?;
            for it in rest {
                write!(f, ", {it}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("bool"),
            Self::U8 => f.write_str("u8"),
            Self::U64 => f.write_str("u64"),
            Self::U128 => f.write_str("u128"),
            Self::Address => f.write_str("address"),
            Self::Signer => f.write_str("signer"),
            Self::Vector(inner) => write!(f, "vector<{inner}>"),
            Self::Struct(tag) => write!(f, "{tag}"),
        }
    }
}
