//! Authentication keys.
//!
//! An account's authentication key commits to the public key(s) allowed to
//! sign for it. The account address is the key's trailing 16 bytes, which is
//! how a fresh key pair determines the address of the account it creates.

use std::fmt;

use diem_sdk_common::{sha3_256_concat, ACCOUNT_ADDRESS_LENGTH, AUTH_KEY_LENGTH};
use ed25519_dalek::VerifyingKey;

use crate::AccountAddress;

/// Signature scheme identifiers, appended to the key material before hashing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Scheme {
    /// A single Ed25519 key.
    Ed25519 = 0,
    /// A k-of-n Ed25519 multisig key.
    MultiEd25519 = 1,
}

/// A 32-byte authentication key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AuthKey([u8; AUTH_KEY_LENGTH]);

impl AuthKey {
    /// Wraps raw key bytes.
    pub const fn new(bytes: [u8; AUTH_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// SHA3-256(`key_material ‖ scheme`).
    pub fn from_scheme(key_material: &[u8], scheme: Scheme) -> Self {
        Self(sha3_256_concat([key_material, &[scheme as u8][..]]))
    }

    /// The authentication key of a single Ed25519 public key.
    pub fn from_public_key(public_key: &VerifyingKey) -> Self {
        Self::from_public_key_bytes(public_key.as_bytes())
    }

    /// The authentication key of raw Ed25519 public key bytes.
    ///
    /// The bytes are hashed as given: they are not checked to be a valid
    /// curve point.
    pub fn from_public_key_bytes(public_key: &[u8; 32]) -> Self {
        Self::from_scheme(public_key, Scheme::Ed25519)
    }

    /// The authentication key of a serialized multisig public key (the
    /// concatenated member keys followed by the threshold byte).
    pub fn from_multi_public_key_bytes(multi_public_key: &[u8]) -> Self {
        Self::from_scheme(multi_public_key, Scheme::MultiEd25519)
    }

    /// The leading 16 bytes, which an account creation transaction carries
    /// alongside the address to reconstruct the full key.
    pub fn prefix(&self) -> [u8; AUTH_KEY_LENGTH - ACCOUNT_ADDRESS_LENGTH] {
        let mut out = [0; AUTH_KEY_LENGTH - ACCOUNT_ADDRESS_LENGTH];
        out.copy_from_slice(&self.0[..AUTH_KEY_LENGTH - ACCOUNT_ADDRESS_LENGTH]);
        out
    }

    /// The address of the account this key creates: the trailing 16 bytes.
    pub fn account_address(&self) -> AccountAddress {
        let mut out = [0; ACCOUNT_ADDRESS_LENGTH];
        out.copy_from_slice(&self.0[AUTH_KEY_LENGTH - ACCOUNT_ADDRESS_LENGTH..]);
        AccountAddress::new(out)
    }

    /// Lowercase hex, without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The raw key bytes.
    pub fn as_bytes(&self) -> &[u8; AUTH_KEY_LENGTH] {
        &self.0
    }
}

impl From<[u8; AUTH_KEY_LENGTH]> for AuthKey {
    fn from(bytes: [u8; AUTH_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AuthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::testing_utils::{test_signing_key, TEST_ADDRESS};

    #[test]
    fn known_public_key() {
        let key = AuthKey::from_public_key_bytes(&hex!(
            "447fc3be296803c2303951c7816624c7566730a5cc6860a4a1bd3c04731569f5"
        ));
        assert_eq!(
            key.to_hex(),
            "459c77a38803bd53f3adee52703810e3a74fd7c46952c497e75afb0a7932586d"
        );
        assert_eq!(key.prefix(), hex!("459c77a38803bd53f3adee52703810e3"));
        assert_eq!(
            key.account_address().to_hex(),
            "a74fd7c46952c497e75afb0a7932586d"
        );
    }

    #[test]
    fn derives_address_from_signing_key() {
        let key = AuthKey::from_public_key(&test_signing_key().verifying_key());
        assert_eq!(key.account_address(), AccountAddress::new(TEST_ADDRESS));
    }

    #[test]
    fn scheme_byte_changes_the_key() {
        let material = [7; 32];
        assert_ne!(
            AuthKey::from_public_key_bytes(&material),
            AuthKey::from_multi_public_key_bytes(&material)
        );
    }
}
