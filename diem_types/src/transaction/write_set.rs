//! Direct state changes, as carried by genesis and write-set transactions.

use diem_bcs::{Decode, Encode};

use super::Script;
use crate::{type_tag::TypeTag, AccountAddress};

/// A path into an account's storage.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct AccessPath {
    /// The account.
    pub address: AccountAddress,
    /// The resource or module path under it.
    pub path: Vec<u8>,
}

/// What happens at one access path.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum WriteOp {
    Deletion,
    Value(Vec<u8>),
}

/// An ordered list of writes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct WriteSet {
    /// The writes, in order.
    pub write_set: Vec<(AccessPath, WriteOp)>,
}

/// Identifies an event stream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct EventKey(pub Vec<u8>);

/// An event emitted by a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum ContractEvent {
    /// The only event layout so far.
    V0 {
        /// The stream the event belongs to.
        key: EventKey,
        /// Position of the event within its stream.
        sequence_number: u64,
        /// Type of `event_data`.
        type_tag: TypeTag,
        /// The encoded event.
        event_data: Vec<u8>,
    },
}

/// Writes together with the events they emit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct ChangeSet {
    /// The writes.
    pub write_set: WriteSet,
    /// The emitted events.
    pub events: Vec<ContractEvent>,
}

/// The payload of a write-set or genesis transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum WriteSetPayload {
    /// Apply the change set as is.
    Direct(ChangeSet),
    /// Run `script` as `execute_as`, with the privileges of the signer.
    Script {
        /// The account the script runs as.
        execute_as: AccountAddress,
        /// The script to run.
        script: Script,
    },
}
