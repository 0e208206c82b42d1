//! Reads an account's resource out of the state blob a node returns for it.
//!
//! The blob is an association list from access path to resource bytes,
//! written in the legacy [`Lcs`](diem_bcs::Lcs) format. Only the account
//! resource is interpreted; every other entry is kept as opaque bytes.

use std::collections::BTreeMap;

use diem_bcs::{lcs, Decode, DeserializeError, Encode};
use diem_sdk_common::{AUTH_KEY_LENGTH, EVENT_KEY_LENGTH};
use hex_literal::hex;
use log::{debug, trace};
use thiserror::Error;

use crate::{AuthKey, LegacyAccountAddress};

/// Access path of the account resource within a state blob.
pub const ACCOUNT_RESOURCE_PATH: [u8; 33] =
    hex!("01a208df134fefed8442b1f01fab59071898f5a1af5164e12c594de55a7004a91c");

/// An error that occurs when reading an account resource from a state blob.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AccountStateError {
    /// The blob, or the resource within it, is not in canonical form.
    #[error(transparent)]
    Deserialize(#[from] DeserializeError),

    /// The blob has no entry at [`ACCOUNT_RESOURCE_PATH`].
    #[error("state blob has no account resource")]
    MissingAccountResource,

    /// The stored authentication key is not 32 bytes.
    #[error("authentication key must be 32 bytes, got {0}")]
    InvalidAuthenticationKey(usize),

    /// A stored event key is not 32 bytes.
    #[error("event key must be 32 bytes, got {0}")]
    InvalidEventKey(usize),
}

/// Access path to resource bytes, sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Encode, Decode)]
pub struct AccountStateBlob(pub BTreeMap<Vec<u8>, Vec<u8>>);

impl AccountStateBlob {
    /// Parses a legacy state blob. The whole input must be one blob.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AccountStateError> {
        Ok(lcs::from_bytes(bytes)?)
    }

    /// The resource stored at `path`.
    pub fn get(&self, path: &[u8]) -> Option<&[u8]> {
        self.0.get(path).map(Vec::as_slice)
    }

    /// The number of resources in the blob.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the blob holds no resources.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A stream of events an account emits, such as its payments sent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EventHandle {
    /// How many events the stream holds.
    pub count: u64,
    /// The stream's key.
    pub key: [u8; EVENT_KEY_LENGTH],
}

/// The account resource, as stored on chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AccountResource {
    /// The account the resource belongs to.
    pub address: LegacyAccountAddress,
    /// The account balance.
    pub balance: u64,
    /// The sequence number the next transaction from this account must use.
    pub sequence: u64,
    /// The key transactions from this account must be authorized by.
    pub authentication_key: AuthKey,
    /// Whether the right to rotate the key has been delegated.
    pub delegated_key_rotation_capability: bool,
    /// Whether the right to withdraw has been delegated.
    pub delegated_withdrawal_capability: bool,
    /// Payments sent.
    pub sent_events: EventHandle,
    /// Payments received.
    pub received_events: EventHandle,
}

// Field order is the on-chain layout.
#[derive(Debug, Encode, Decode)]
struct StoredAccountResource {
    authentication_key: Vec<u8>,
    balance: u64,
    delegated_key_rotation_capability: bool,
    delegated_withdrawal_capability: bool,
    received_events: StoredEventHandle,
    sent_events: StoredEventHandle,
    sequence_number: u64,
}

#[derive(Debug, Encode, Decode)]
struct StoredEventHandle {
    count: u64,
    key: Vec<u8>,
}

impl TryFrom<StoredEventHandle> for EventHandle {
    type Error = AccountStateError;

    fn try_from(stored: StoredEventHandle) -> Result<Self, Self::Error> {
        let len = stored.key.len();
        Ok(Self {
            count: stored.count,
            key: stored
                .key
                .try_into()
                .map_err(|_| AccountStateError::InvalidEventKey(len))?,
        })
    }
}

impl AccountResource {
    /// The resource of an account that has never been written to.
    pub fn empty(address: LegacyAccountAddress) -> Self {
        Self {
            address,
            balance: 0,
            sequence: 0,
            authentication_key: AuthKey::new(address.into_bytes()),
            delegated_key_rotation_capability: false,
            delegated_withdrawal_capability: false,
            sent_events: EventHandle::default(),
            received_events: EventHandle::default(),
        }
    }

    /// Decodes the account resource from the state blob a node returned for
    /// `address`.
    ///
    /// An empty blob is an account with no state yet, and decodes to
    /// [`AccountResource::empty`].
    pub fn from_state_blob(
        address: LegacyAccountAddress,
        blob: &[u8],
    ) -> Result<Self, AccountStateError> {
        if blob.is_empty() {
            debug!("empty state blob for {address}");
            return Ok(Self::empty(address));
        }

        let state = AccountStateBlob::from_bytes(blob)?;
        let resource = state
            .get(&ACCOUNT_RESOURCE_PATH)
            .ok_or(AccountStateError::MissingAccountResource)?;
        trace!(
            "account resource for {address} is {} of {} bytes in the blob",
            resource.len(),
            blob.len()
        );
        let stored = lcs::from_bytes::<StoredAccountResource>(resource)?;

        let key_len = stored.authentication_key.len();
        let authentication_key: [u8; AUTH_KEY_LENGTH] = stored
            .authentication_key
            .try_into()
            .map_err(|_| AccountStateError::InvalidAuthenticationKey(key_len))?;

        Ok(Self {
            address,
            balance: stored.balance,
            sequence: stored.sequence_number,
            authentication_key: AuthKey::new(authentication_key),
            delegated_key_rotation_capability: stored.delegated_key_rotation_capability,
            delegated_withdrawal_capability: stored.delegated_withdrawal_capability,
            sent_events: stored.sent_events.try_into()?,
            received_events: stored.received_events.try_into()?,
        })
    }
}
