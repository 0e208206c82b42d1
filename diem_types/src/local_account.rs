//! An account whose private keys are held in memory.
//!
//! Handy for tests and tools. Production wallets should keep keys in a
//! hardware module and only hand the signing message over to it.

use diem_sdk_common::{hrp, NetworkConfig};
use ed25519_dalek::{Signer as _, SigningKey, SECRET_KEY_LENGTH};
use rand::{rngs::OsRng, CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

pub use crate::transaction::SigningError;
use crate::{
    identifier::{self, IdentifierError},
    transaction::{ChainId, Ed25519PublicKey, RawTransaction, SignedTransaction, TransactionPayload},
    type_tag::TypeTag,
    AccountAddress, AuthKey, SubAddress,
};

/// The settings [`LocalAccount::build_transaction`] fills in.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransactionDefaults {
    /// Currency gas is paid in.
    #[serde(rename = "txn_gas_currency_code", default = "default_gas_currency_code")]
    pub gas_currency_code: String,
    /// The most gas units a transaction may use.
    #[serde(rename = "txn_max_gas_amount", default = "default_max_gas_amount")]
    pub max_gas_amount: u64,
    /// Price of each gas unit.
    #[serde(rename = "txn_gas_unit_price", default)]
    pub gas_unit_price: u64,
    /// How long after it is built a transaction expires.
    #[serde(rename = "txn_expire_duration_secs", default = "default_expire_duration_secs")]
    pub expire_duration_secs: u64,
}

fn default_gas_currency_code() -> String {
    "XUS".to_owned()
}

const fn default_max_gas_amount() -> u64 {
    1_000_000
}

const fn default_expire_duration_secs() -> u64 {
    30
}

fn default_hrp() -> String {
    hrp::TESTNET.to_owned()
}

impl Default for TransactionDefaults {
    fn default() -> Self {
        Self {
            gas_currency_code: default_gas_currency_code(),
            max_gas_amount: default_max_gas_amount(),
            gas_unit_price: 0,
            expire_duration_secs: default_expire_duration_secs(),
        }
    }
}

/// The serialized form of a [`LocalAccount`]. Keys are hex.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalAccountConfig {
    /// The signing key.
    pub private_key: String,
    /// The key for signing off-chain messages. A new one is generated when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compliance_key: Option<String>,
    /// Prefix of the account's identifiers.
    #[serde(default = "default_hrp")]
    pub hrp: String,
    /// Transaction settings.
    #[serde(flatten)]
    pub defaults: TransactionDefaults,
}

/// An account with its signing key and a compliance key for off-chain
/// messages.
#[derive(Clone, Debug)]
pub struct LocalAccount {
    signing_key: SigningKey,
    compliance_key: SigningKey,
    /// Prefix of the account's identifiers.
    pub hrp: String,
    /// Transaction settings.
    pub defaults: TransactionDefaults,
}

fn signing_key_from_hex(key: &str) -> Result<SigningKey, SigningError> {
    let bytes = hex::decode(key).map_err(|e| SigningError::InvalidPrivateKey(e.to_string()))?;
    let secret: [u8; SECRET_KEY_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
        SigningError::InvalidPrivateKey(format!(
            "expected {SECRET_KEY_LENGTH} bytes, got {}",
            bytes.len()
        ))
    })?;
    Ok(SigningKey::from_bytes(&secret))
}

impl LocalAccount {
    /// An account for the given keys, with testnet defaults.
    pub fn new(signing_key: SigningKey, compliance_key: SigningKey) -> Self {
        Self {
            signing_key,
            compliance_key,
            hrp: default_hrp(),
            defaults: TransactionDefaults::default(),
        }
    }

    /// An account with fresh keys.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        let signing_key = SigningKey::generate(rng);
        Self::new(signing_key, SigningKey::generate(rng))
    }

    /// An account for a hex private key, with a fresh compliance key.
    pub fn from_private_key_hex(key: &str) -> Result<Self, SigningError> {
        Ok(Self::new(
            signing_key_from_hex(key)?,
            SigningKey::generate(&mut OsRng),
        ))
    }

    /// Restores an account saved with [`LocalAccount::to_config`].
    pub fn from_config(config: &LocalAccountConfig) -> Result<Self, SigningError> {
        let compliance_key = match &config.compliance_key {
            Some(key) => signing_key_from_hex(key)?,
            None => SigningKey::generate(&mut OsRng),
        };
        TypeTag::from_currency_code(&config.defaults.gas_currency_code)?;
        Ok(Self {
            signing_key: signing_key_from_hex(&config.private_key)?,
            compliance_key,
            hrp: config.hrp.clone(),
            defaults: config.defaults.clone(),
        })
    }

    /// The account's keys and settings, for saving.
    pub fn to_config(&self) -> LocalAccountConfig {
        LocalAccountConfig {
            private_key: hex::encode(self.signing_key.to_bytes()),
            compliance_key: Some(hex::encode(self.compliance_key.to_bytes())),
            hrp: self.hrp.clone(),
            defaults: self.defaults.clone(),
        }
    }

    /// Uses the network's identifier prefix.
    pub fn with_network(mut self, network: &NetworkConfig) -> Self {
        self.hrp.clone_from(&network.hrp);
        self
    }

    /// The key transactions from this account are authorized by.
    pub fn auth_key(&self) -> AuthKey {
        AuthKey::from_public_key(&self.signing_key.verifying_key())
    }

    /// The account's address.
    pub fn account_address(&self) -> AccountAddress {
        self.auth_key().account_address()
    }

    /// The public key, as attached to signed transactions.
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey::from(&self.signing_key.verifying_key())
    }

    /// The raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The raw compliance public key bytes, as registered on chain.
    pub fn compliance_public_key_bytes(&self) -> [u8; 32] {
        self.compliance_key.verifying_key().to_bytes()
    }

    /// Signs `message` with the compliance key.
    pub fn sign_compliance_message(&self, message: &[u8]) -> [u8; 64] {
        self.compliance_key.sign(message).to_bytes()
    }

    /// Signs a transaction from this account.
    pub fn sign(&self, txn: RawTransaction) -> SignedTransaction {
        let signature = self.signing_key.sign(&txn.signing_message());
        SignedTransaction::from_raw_and_signature(txn, self.public_key(), signature.into())
    }

    /// A transaction from this account, filled in from
    /// [`LocalAccount::defaults`]. It expires
    /// [`TransactionDefaults::expire_duration_secs`] after `now_secs`.
    pub fn build_transaction(
        &self,
        sequence_number: u64,
        payload: TransactionPayload,
        chain_id: ChainId,
        now_secs: u64,
    ) -> Result<RawTransaction, SigningError> {
        TypeTag::from_currency_code(&self.defaults.gas_currency_code)?;
        Ok(RawTransaction {
            sender: self.account_address(),
            sequence_number,
            payload,
            max_gas_amount: self.defaults.max_gas_amount,
            gas_unit_price: self.defaults.gas_unit_price,
            gas_currency_code: self.defaults.gas_currency_code.clone(),
            expiration_timestamp_secs: now_secs.saturating_add(self.defaults.expire_duration_secs),
            chain_id,
        })
    }

    /// Builds and signs a transaction.
    pub fn create_transaction(
        &self,
        sequence_number: u64,
        payload: TransactionPayload,
        chain_id: ChainId,
        now_secs: u64,
    ) -> Result<SignedTransaction, SigningError> {
        Ok(self.sign(self.build_transaction(sequence_number, payload, chain_id, now_secs)?))
    }

    /// The identifier of this account, or of one of its users.
    pub fn account_identifier(
        &self,
        sub_address: Option<SubAddress>,
    ) -> Result<String, IdentifierError> {
        identifier::encode_account(self.account_address(), sub_address, &self.hrp)
    }

    /// Decodes an identifier under this account's prefix.
    pub fn decode_account_identifier(
        &self,
        s: &str,
    ) -> Result<(AccountAddress, Option<SubAddress>), IdentifierError> {
        identifier::decode_account(s, &self.hrp)
    }
}
