//! Conversions for callers holding addresses and codes as text or raw bytes.

use crate::{
    account_address::InvalidAccountAddressError,
    sub_address::InvalidSubAddressError,
    transaction::{Ed25519PublicKey, Ed25519Signature, RawTransaction, SignedTransaction},
    type_tag::{TypeTag, TypeTagError},
    AccountAddress, SubAddress,
};

/// Either hex text or raw bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HexOrBytes<'a> {
    /// Hex digits of either case, without a prefix.
    Hex(&'a str),
    /// Raw bytes.
    Bytes(&'a [u8]),
}

impl<'a> From<&'a str> for HexOrBytes<'a> {
    fn from(s: &'a str) -> Self {
        Self::Hex(s)
    }
}

impl<'a> From<&'a String> for HexOrBytes<'a> {
    fn from(s: &'a String) -> Self {
        Self::Hex(s)
    }
}

impl<'a> From<&'a [u8]> for HexOrBytes<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Self::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for HexOrBytes<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Self::Bytes(bytes)
    }
}

/// Parses a 16-byte account address from hex or bytes.
pub fn account_address<'a>(
    input: impl Into<HexOrBytes<'a>>,
) -> Result<AccountAddress, InvalidAccountAddressError> {
    match input.into() {
        HexOrBytes::Hex(s) => AccountAddress::from_hex(s),
        HexOrBytes::Bytes(bytes) => AccountAddress::try_from(bytes),
    }
}

/// Parses an 8-byte subaddress from hex or bytes.
pub fn sub_address<'a>(
    input: impl Into<HexOrBytes<'a>>,
) -> Result<SubAddress, InvalidSubAddressError> {
    match input.into() {
        HexOrBytes::Hex(s) => SubAddress::from_hex(s),
        HexOrBytes::Bytes(bytes) => SubAddress::try_from(bytes),
    }
}

/// The type tag of a currency code.
pub fn currency_code(code: &str) -> Result<TypeTag, TypeTagError> {
    TypeTag::from_currency_code(code)
}

/// The currency code a type tag names.
pub fn type_tag_to_str(tag: &TypeTag) -> Result<String, TypeTagError> {
    tag.to_currency_code()
}

/// Attaches a detached Ed25519 signature to a transaction.
pub fn create_signed_transaction(
    txn: RawTransaction,
    public_key: [u8; 32],
    signature: [u8; 64],
) -> SignedTransaction {
    SignedTransaction::from_raw_and_signature(
        txn,
        Ed25519PublicKey(public_key),
        Ed25519Signature(signature),
    )
}

/// The bytes to sign for `txn`.
pub fn raw_transaction_signing_msg(txn: &RawTransaction) -> Vec<u8> {
    txn.signing_message()
}

/// The hex transaction hash, as the node reports it.
pub fn transaction_hash(txn: &SignedTransaction) -> String {
    txn.hash().to_hex()
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::transaction::tests::{p2p_transfer, PUBLIC_KEY, SIGNATURE};

    #[test]
    fn account_addresses() {
        let expected = AccountAddress::new(hex!("f72589b71ff4f8d139674a3f7369c69b"));
        assert_eq!(
            account_address("f72589b71ff4f8d139674a3f7369c69b").unwrap(),
            expected
        );
        assert_eq!(
            account_address("F72589B71FF4F8D139674A3F7369C69B").unwrap(),
            expected
        );
        assert_eq!(account_address(expected.as_bytes()).unwrap(), expected);

        assert_eq!(
            account_address("f72589b71ff4f8d139674a3f7369c69bff"),
            Err(InvalidAccountAddressError::InvalidLength {
                expected: 16,
                actual: 17
            })
        );
        assert_eq!(
            account_address(&[0u8; 15][..]),
            Err(InvalidAccountAddressError::InvalidLength {
                expected: 16,
                actual: 15
            })
        );
        assert!(matches!(
            account_address("xyz"),
            Err(InvalidAccountAddressError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn sub_addresses() {
        assert_eq!(
            sub_address("cf64428bdeb62af2").unwrap(),
            SubAddress::new(hex!("cf64428bdeb62af2"))
        );
        assert_eq!(
            sub_address(&hex!("cf64428bdeb62af2")).unwrap().to_hex(),
            "cf64428bdeb62af2"
        );
        assert_eq!(
            sub_address("cf64428bdeb62a"),
            Err(InvalidSubAddressError::InvalidLength(7))
        );
        assert_eq!(
            sub_address(&b"helloworld"[..]),
            Err(InvalidSubAddressError::InvalidLength(10))
        );
        assert!(matches!(
            sub_address("cf64428bdeb62afz"),
            Err(InvalidSubAddressError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn currency_codes() {
        let tag = currency_code("XUS").unwrap();
        assert_eq!(type_tag_to_str(&tag).unwrap(), "XUS");
        assert!(type_tag_to_str(&TypeTag::U64).is_err());
    }

    #[test]
    fn signed_transactions() {
        let txn = create_signed_transaction(p2p_transfer(), PUBLIC_KEY, SIGNATURE);
        assert_eq!(
            raw_transaction_signing_msg(&txn.raw_txn),
            p2p_transfer().signing_message()
        );
        assert_eq!(
            transaction_hash(&txn),
            "b44e9e32b10c05068135691d4405518fb99379da93b4177b32c8bdb0074f1b4f"
        );
    }
}
