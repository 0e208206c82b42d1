//! Constants, hashing and network presets shared by the Diem SDK crates.

use hex_literal::hex;
use serde::{Deserialize, Serialize};
use tiny_keccak::{Hasher as _, Sha3};

/// Prepended to a type name to derive its hash seed.
pub const DIEM_HASH_PREFIX: &[u8] = b"DIEM::";

/// Length of an account address in the current format.
pub const ACCOUNT_ADDRESS_LENGTH: usize = 16;
/// Length of an account address in the legacy account-state format.
pub const LEGACY_ACCOUNT_ADDRESS_LENGTH: usize = 32;
/// Length of a subaddress.
pub const SUB_ADDRESS_LENGTH: usize = 8;
/// Length of an authentication key.
pub const AUTH_KEY_LENGTH: usize = 32;
/// Length of an event key in the legacy account-state format.
pub const EVENT_KEY_LENGTH: usize = 32;
/// Length of an Ed25519 public key.
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
/// Length of an Ed25519 signature.
pub const ED25519_SIGNATURE_LENGTH: usize = 64;

/// Address the Move standard library and currencies are published under.
/// 0x00000000000000000000000000000001
pub const CORE_CODE_ADDRESS: [u8; ACCOUNT_ADDRESS_LENGTH] = hex!("00000000000000000000000000000001");

/// The Diem root account.
/// 0x0000000000000000000000000a550c18
pub const ROOT_ADDRESS: [u8; ACCOUNT_ADDRESS_LENGTH] = hex!("0000000000000000000000000a550c18");

/// The treasury compliance account.
/// 0x0000000000000000000000000b1e55ed
pub const TREASURY_ADDRESS: [u8; ACCOUNT_ADDRESS_LENGTH] =
    hex!("0000000000000000000000000b1e55ed");

/// Well-known chain ids.
pub mod chain_ids {
    pub const MAINNET: u8 = 1;
    pub const TESTNET: u8 = 2;
    pub const DEVNET: u8 = 3;
    pub const TESTING: u8 = 4;
}

/// Human readable parts for bech32 account identifiers.
pub mod hrp {
    use crate::chain_ids;

    pub const MAINNET: &str = "dm";
    pub const TESTNET: &str = "tdm";
    pub const PREMAINNET: &str = "pdm";

    /// The identifier prefix used on the given chain.
    pub fn for_chain_id(chain_id: u8) -> Option<&'static str> {
        match chain_id {
            chain_ids::MAINNET => Some(MAINNET),
            chain_ids::TESTNET | chain_ids::DEVNET | chain_ids::TESTING => Some(TESTNET),
            _ => None,
        }
    }
}

/// SHA3-256 of `data`.
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha3::v256();
    hasher.update(data);
    let mut out = [0; 32];
    hasher.finalize(&mut out);
    out
}

/// SHA3-256 of the concatenation of `parts`.
pub fn sha3_256_concat<'a>(parts: impl IntoIterator<Item = &'a [u8]>) -> [u8; 32] {
    let mut hasher = Sha3::v256();
    for part in parts {
        hasher.update(part);
    }
    let mut out = [0; 32];
    hasher.finalize(&mut out);
    out
}

/// The domain separator for hashing values of the named type:
/// SHA3-256(`"DIEM::" ‖ name`).
pub fn hash_seed(name: &str) -> [u8; 32] {
    sha3_256_concat([DIEM_HASH_PREFIX, name.as_bytes()])
}

/// `hash_seed("RawTransaction")`, prepended to a raw transaction before
/// signing.
/// 0xe74c3978c4493b06fec031b3b5b97fee945b2d7628528d85d19509dab9f4189c
pub const RAW_TRANSACTION_HASH_SEED: [u8; 32] = [
    231, 76, 57, 120, 196, 73, 59, 6, 254, 192, 49, 179, 181, 185, 127, 238, 148, 91, 45, 118, 40,
    82, 141, 133, 209, 149, 9, 218, 185, 244, 24, 156,
];

/// `hash_seed("Transaction")`, prepended to a transaction before hashing.
/// 0xa57f37b6effd9fca550b609f55ac4cabc6e58784f0e1a99877bfef3c9840ba79
pub const TRANSACTION_HASH_SEED: [u8; 32] = [
    165, 127, 55, 182, 239, 253, 159, 202, 85, 11, 96, 159, 85, 172, 76, 171, 198, 229, 135, 132,
    240, 225, 169, 152, 119, 191, 239, 60, 152, 64, 186, 121,
];

/// The settings that differ between networks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub chain_id: u8,
    pub hrp: String,
}

impl NetworkConfig {
    fn preset(chain_id: u8) -> Self {
        Self {
            chain_id,
            hrp: hrp::for_chain_id(chain_id)
                .expect("presets only use known chain ids")
                .to_owned(),
        }
    }

    pub fn mainnet() -> Self {
        Self::preset(chain_ids::MAINNET)
    }

    pub fn testnet() -> Self {
        Self::preset(chain_ids::TESTNET)
    }

    pub fn devnet() -> Self {
        Self::preset(chain_ids::DEVNET)
    }

    pub fn testing() -> Self {
        Self::preset(chain_ids::TESTING)
    }

    /// The preset for a well-known chain id.
    pub fn for_chain_id(chain_id: u8) -> Option<Self> {
        hrp::for_chain_id(chain_id).map(|_| Self::preset(chain_id))
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self::testnet()
    }
}

#[test]
fn test_raw_transaction_hash_seed() {
    assert_eq!(RAW_TRANSACTION_HASH_SEED, hash_seed("RawTransaction"));
}

#[test]
fn test_transaction_hash_seed() {
    assert_eq!(TRANSACTION_HASH_SEED, hash_seed("Transaction"));
}

#[test]
fn test_sha3_256() {
    assert_eq!(
        hex::encode(sha3_256(b"")),
        "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
    );
    assert_eq!(sha3_256(b"abc"), sha3_256_concat([&b"a"[..], &b"bc"[..]]));
}

#[test]
fn test_network_presets() {
    assert_eq!(NetworkConfig::mainnet().hrp, "dm");
    assert_eq!(NetworkConfig::default(), NetworkConfig::testnet());
    assert_eq!(NetworkConfig::for_chain_id(4), Some(NetworkConfig::testing()));
    assert_eq!(NetworkConfig::for_chain_id(9), None);

    let config: NetworkConfig = serde_json::from_str(r#"{"chain_id": 3, "hrp": "tdm"}"#).unwrap();
    assert_eq!(config, NetworkConfig::devnet());
}
