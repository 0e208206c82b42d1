//! Fixed-width account addresses.

use std::{fmt, str::FromStr};

use diem_bcs::{Decode, Encode, Format, PResult};
use diem_sdk_common::{
    ACCOUNT_ADDRESS_LENGTH, CORE_CODE_ADDRESS, LEGACY_ACCOUNT_ADDRESS_LENGTH, ROOT_ADDRESS,
    TREASURY_ADDRESS,
};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An `N`-byte account address, written on the wire as `N` raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address<const N: usize>([u8; N]);

/// The 16-byte address used by transactions and identifiers.
pub type AccountAddress = Address<ACCOUNT_ADDRESS_LENGTH>;

/// The 32-byte address of the legacy account-state format.
pub type LegacyAccountAddress = Address<LEGACY_ACCOUNT_ADDRESS_LENGTH>;

/// An error that occurs when parsing an address from hex or bytes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum InvalidAccountAddressError {
    /// The input decoded to the wrong number of bytes.
    #[error("account address must be {expected} bytes, got {actual}")]
    InvalidLength {
        /// The address width.
        expected: usize,
        /// The number of bytes given.
        actual: usize,
    },

    /// The input was not hex.
    #[error("account address is not valid hex: {0}")]
    InvalidEncoding(#[from] hex::FromHexError),
}

impl<const N: usize> Address<N> {
    /// The length of this address in bytes.
    pub const LENGTH: usize = N;

    /// The all-zero address.
    pub const ZERO: Self = Self([0; N]);

    /// Wraps raw address bytes.
    pub const fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Parses an address from exactly `2 * N` hex digits of either case.
    pub fn from_hex(s: impl AsRef<[u8]>) -> Result<Self, InvalidAccountAddressError> {
        let bytes = hex::decode(s)?;
        Self::try_from(bytes.as_slice())
    }

    /// Lowercase hex, without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Unwraps the raw address bytes.
    pub fn into_bytes(self) -> [u8; N] {
        self.0
    }
}

impl AccountAddress {
    /// Where the Move standard library and currencies live.
    pub const CORE_CODE: Self = Self(CORE_CODE_ADDRESS);

    /// The root account.
    pub const ROOT: Self = Self(ROOT_ADDRESS);

    /// The treasury compliance account.
    pub const TREASURY: Self = Self(TREASURY_ADDRESS);
}

impl<const N: usize> TryFrom<&[u8]> for Address<N> {
    type Error = InvalidAccountAddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <[u8; N]>::try_from(bytes)
            .map(Self)
            .map_err(|_| InvalidAccountAddressError::InvalidLength {
                expected: N,
                actual: bytes.len(),
            })
    }
}

impl<const N: usize> From<[u8; N]> for Address<N> {
    fn from(bytes: [u8; N]) -> Self {
        Self(bytes)
    }
}

impl<const N: usize> AsRef<[u8]> for Address<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> fmt::Display for Address<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> fmt::LowerHex for Address<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            f.write_str("0x")?;
        }
        f.write_str(&self.to_hex())
    }
}

impl<const N: usize> FromStr for Address<N> {
    type Err = InvalidAccountAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl<const N: usize> Encode for Address<N> {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        self.0.encode::<F>(out)
    }
}

impl<const N: usize> Decode for Address<N> {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        <[u8; N]>::decode::<F>(input).map(Self)
    }
}

impl<const N: usize> Serialize for Address<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de, const N: usize> Deserialize<'de> for Address<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;

    #[test]
    fn parses_exact_width_hex() {
        let address = AccountAddress::from_hex("0000000000000000000000000a550c18").unwrap();
        assert_eq!(address, AccountAddress::ROOT);
        assert_eq!(
            AccountAddress::from_hex("F72589B71FF4F8D139674A3F7369C69B").unwrap(),
            AccountAddress::new(hex!("f72589b71ff4f8d139674a3f7369c69b"))
        );

        assert_eq!(
            AccountAddress::from_hex("aaaa"),
            Err(InvalidAccountAddressError::InvalidLength {
                expected: 16,
                actual: 2
            })
        );
        assert!(matches!(
            AccountAddress::from_hex("0000000000000000000000000a550c1x"),
            Err(InvalidAccountAddressError::InvalidEncoding(_))
        ));
        assert!(LegacyAccountAddress::from_hex("0000000000000000000000000a550c18").is_err());
    }

    #[test]
    fn formats_lowercase() {
        let address = AccountAddress::new(hex!("F72589B71FF4F8D139674A3F7369C69B"));
        assert_eq!(address.to_string(), "f72589b71ff4f8d139674a3f7369c69b");
        assert_eq!(
            format!("{address:#x}"),
            "0xf72589b71ff4f8d139674a3f7369c69b"
        );
        assert_eq!(
            "f72589b71ff4f8d139674a3f7369c69b"
                .parse::<AccountAddress>()
                .unwrap(),
            address
        );
    }

    #[test]
    fn raw_bytes_on_the_wire() {
        let address = AccountAddress::CORE_CODE;
        let bytes = diem_bcs::to_bytes(&address);
        assert_eq!(bytes, CORE_CODE_ADDRESS);
        assert_eq!(diem_bcs::from_bytes::<AccountAddress>(&bytes).unwrap(), address);
        assert!(diem_bcs::from_bytes::<AccountAddress>(&bytes[1..]).is_err());
    }

    #[test]
    fn serde_as_hex() {
        let json = serde_json::to_string(&AccountAddress::TREASURY).unwrap();
        assert_eq!(json, r#""0000000000000000000000000b1e55ed""#);
        assert_eq!(
            serde_json::from_str::<AccountAddress>(&json).unwrap(),
            AccountAddress::TREASURY
        );
        assert!(serde_json::from_str::<AccountAddress>(r#""00""#).is_err());
    }
}
