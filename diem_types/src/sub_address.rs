//! Subaddresses: 8-byte tags a custodial account uses to tell its users'
//! payments apart.

use std::fmt;

use diem_sdk_common::SUB_ADDRESS_LENGTH;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

/// An 8-byte subaddress. [`SubAddress::ZERO`] is reserved to mean "no
/// subaddress".
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubAddress([u8; SUB_ADDRESS_LENGTH]);

/// An error that occurs when parsing a subaddress from hex or bytes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidSubAddressError {
    /// The input decoded to the wrong number of bytes.
    #[error("subaddress must be 8 bytes, got {0}")]
    InvalidLength(usize),

    /// The input was not hex.
    #[error("subaddress is not valid hex: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),
}

impl SubAddress {
    /// The reserved "no subaddress" value.
    pub const ZERO: Self = Self([0; SUB_ADDRESS_LENGTH]);

    /// Wraps raw subaddress bytes.
    pub const fn new(bytes: [u8; SUB_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Draws a random subaddress, retrying in the unlikely event it comes out
    /// as [`SubAddress::ZERO`].
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        loop {
            let mut bytes = [0; SUB_ADDRESS_LENGTH];
            rng.fill_bytes(&mut bytes);
            let it = Self(bytes);
            if !it.is_zero() {
                return it;
            }
        }
    }

    /// Parses exactly 16 hex digits of either case.
    pub fn from_hex(s: impl AsRef<[u8]>) -> Result<Self, InvalidSubAddressError> {
        let bytes = hex::decode(s)?;
        Self::try_from(bytes.as_slice())
    }

    /// Lowercase hex, without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Whether this is the reserved "no subaddress" value.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// The raw subaddress bytes.
    pub fn as_bytes(&self) -> &[u8; SUB_ADDRESS_LENGTH] {
        &self.0
    }

    /// Unwraps the raw subaddress bytes.
    pub fn into_bytes(self) -> [u8; SUB_ADDRESS_LENGTH] {
        self.0
    }
}

impl TryFrom<&[u8]> for SubAddress {
    type Error = InvalidSubAddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; SUB_ADDRESS_LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| InvalidSubAddressError::InvalidLength(bytes.len()))
    }
}

impl From<[u8; SUB_ADDRESS_LENGTH]> for SubAddress {
    fn from(bytes: [u8; SUB_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for SubAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn parses_exact_width() {
        assert_eq!(
            SubAddress::from_hex("aa"),
            Err(InvalidSubAddressError::InvalidLength(1))
        );
        assert_eq!(
            SubAddress::from_hex("aaaaaaaaaaaaaaaa").unwrap(),
            SubAddress::new([0xaa; 8])
        );
        assert!(matches!(
            SubAddress::from_hex("aaaaaaaaaaaaaaag"),
            Err(InvalidSubAddressError::InvalidEncoding(_))
        ));
        assert!(SubAddress::try_from(&[1u8; 9][..]).is_err());
    }

    #[test]
    fn generated_subaddresses_are_not_zero() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let a = SubAddress::generate(&mut rng);
        let b = SubAddress::generate(&mut rng);
        assert!(!a.is_zero());
        assert_ne!(a, b);
        assert_eq!(a.to_hex().len(), 16);
    }
}
