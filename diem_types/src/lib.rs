//! Diem transaction, account-state and metadata types.
//!
//! Every type here has a canonical encoding through [`diem_bcs`], and the
//! bytes it produces are exactly what the network hashes and signs:
//! - [`transaction`] builds, signs and hashes transactions.
//! - [`account_state`] reads an account's resource out of the state blob a
//!   node returns.
//! - [`metadata`] and [`txn_metadata`] read and write the metadata attached
//!   to peer to peer payments.
//! - [`identifier`] encodes accounts and payment intents as bech32 strings
//!   and URIs.
//!
//! Nothing here performs I/O or holds shared state: every value is a plain
//! `Send + Sync` value.

#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_debug_implementations)]
#![warn(missing_docs)]

pub mod account_address;
pub mod account_state;
pub mod auth_key;
pub mod identifier;
pub mod local_account;
pub mod metadata;
pub mod sub_address;
pub mod transaction;
pub mod txn_metadata;
pub mod type_tag;
pub mod utils;

#[cfg(test)]
pub(crate) mod testing_utils;

pub use account_address::{AccountAddress, LegacyAccountAddress};
pub use auth_key::AuthKey;
pub use sub_address::SubAddress;
