use ed25519_dalek::SigningKey;
use hex_literal::hex;

/// Private key of the account used throughout the signing fixtures.
pub(crate) const TEST_PRIVATE_KEY: [u8; 32] =
    hex!("ab70ae3aa603641f049a3356927d0ba836f775e862f559073a6281782479fd1e");

/// The address derived from [`TEST_PRIVATE_KEY`].
pub(crate) const TEST_ADDRESS: [u8; 16] = hex!("a8e087ac04e218e61c92b0309a511c5a");

pub(crate) fn common_setup() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

pub(crate) fn test_signing_key() -> SigningKey {
    SigningKey::from_bytes(&TEST_PRIVATE_KEY)
}
