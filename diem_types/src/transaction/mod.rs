//! Transactions: what a sender asks the network to do, how it is signed, and
//! how the network names it once accepted.
//!
//! A [`RawTransaction`] is signed over its [signing message], the signature
//! is attached to make a [`SignedTransaction`], and the signed transaction's
//! BCS encoding is what gets submitted. Once executed, the network refers to
//! it by [`SignedTransaction::hash`].
//!
//! [signing message]: RawTransaction::signing_message

mod authenticator;
mod write_set;

use std::fmt;

use diem_bcs::{read_sized_bytes, write_bytes, Bcs, Decode, Encode, Format, PResult};
use diem_sdk_common::{chain_ids, sha3_256_concat, RAW_TRANSACTION_HASH_SEED, TRANSACTION_HASH_SEED};
use log::trace;

pub use authenticator::{
    Ed25519PublicKey, Ed25519Signature, MultiEd25519PublicKey, MultiEd25519Signature,
    SigningError, TransactionAuthenticator,
};
pub use write_set::{
    AccessPath, ChangeSet, ContractEvent, EventKey, WriteOp, WriteSet, WriteSetPayload,
};

use crate::{
    type_tag::{Identifier, ModuleId, TypeTag},
    AccountAddress,
};

/// Which network a transaction is meant for, so it can't be replayed on
/// another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Encode, Decode)]
pub struct ChainId(pub u8);

impl ChainId {
    /// The main network.
    pub const MAINNET: Self = Self(chain_ids::MAINNET);
    /// The public test network.
    pub const TESTNET: Self = Self(chain_ids::TESTNET);
    /// The development network.
    pub const DEVNET: Self = Self(chain_ids::DEVNET);
    /// Local test networks.
    pub const TESTING: Self = Self(chain_ids::TESTING);
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value passed to a script.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum TransactionArgument {
    U8(u8),
    U64(u64),
    U128(u128),
    Address(AccountAddress),
    U8Vector(Vec<u8>),
    Bool(bool),
}

/// Move bytecode to run once, with its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct Script {
    /// The compiled script.
    pub code: Vec<u8>,
    /// Type arguments.
    pub ty_args: Vec<TypeTag>,
    /// Value arguments.
    pub args: Vec<TransactionArgument>,
}

/// A module to publish.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct Module {
    /// The compiled module.
    pub code: Vec<u8>,
}

/// A call to a function already published on chain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct ScriptFunction {
    /// The module declaring the function.
    pub module: ModuleId,
    /// The function name.
    pub function: Identifier,
    /// Type arguments.
    pub ty_args: Vec<TypeTag>,
    /// Each argument, BCS encoded on its own.
    pub args: Vec<Vec<u8>>,
}

/// What a transaction does.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum TransactionPayload {
    WriteSet(WriteSetPayload),
    Script(Script),
    Module(Module),
    ScriptFunction(ScriptFunction),
}

/// An unsigned transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct RawTransaction {
    /// The sending account.
    pub sender: AccountAddress,
    /// Must equal the sender's on-chain sequence number for the transaction
    /// to execute.
    pub sequence_number: u64,
    /// What to do.
    pub payload: TransactionPayload,
    /// The most gas units the sender will pay for.
    pub max_gas_amount: u64,
    /// Price of each gas unit, in `gas_currency_code`.
    pub gas_unit_price: u64,
    /// Currency gas is paid in, such as `XUS`.
    pub gas_currency_code: String,
    /// The transaction is discarded if not executed by this time.
    pub expiration_timestamp_secs: u64,
    /// The network the transaction is for.
    pub chain_id: ChainId,
}

impl RawTransaction {
    /// The bytes a sender signs: `hash_seed("RawTransaction") ‖ BCS(self)`.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut out = RAW_TRANSACTION_HASH_SEED.to_vec();
        self.encode::<Bcs>(&mut out);
        out
    }
}

/// A transaction together with its sender's authorization.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct SignedTransaction {
    /// The transaction.
    pub raw_txn: RawTransaction,
    /// The sender's signature.
    pub authenticator: TransactionAuthenticator,
}

impl SignedTransaction {
    /// Attaches a single Ed25519 signature, without checking it.
    pub fn from_raw_and_signature(
        raw_txn: RawTransaction,
        public_key: Ed25519PublicKey,
        signature: Ed25519Signature,
    ) -> Self {
        Self {
            raw_txn,
            authenticator: TransactionAuthenticator::Ed25519 {
                public_key,
                signature,
            },
        }
    }

    /// Checks the signature locally, before paying for a round trip to find
    /// out it is wrong.
    pub fn verify_signature(&self) -> Result<(), SigningError> {
        self.authenticator.verify(&self.raw_txn.signing_message())
    }

    /// The hash the network identifies this transaction by once accepted:
    /// SHA3-256(`hash_seed("Transaction") ‖ BCS(Transaction::UserTransaction(self))`).
    pub fn hash(&self) -> HashValue {
        // encoded as `Transaction::UserTransaction(self)` without the clone
        let mut encoded = Vec::new();
        Bcs::write_variant_index(&mut encoded, 0);
        self.encode::<Bcs>(&mut encoded);
        let hash = HashValue(sha3_256_concat([&TRANSACTION_HASH_SEED[..], &encoded[..]]));
        trace!(
            "hashed transaction {}/{}: {hash}",
            self.raw_txn.sender,
            self.raw_txn.sequence_number
        );
        hash
    }
}

/// A 32-byte hash, written as a length-prefixed byte string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Lowercase hex, without a prefix.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Encode for HashValue {
    fn encode<F: Format>(&self, out: &mut Vec<u8>) {
        write_bytes::<F>(out, &self.0)
    }
}

impl Decode for HashValue {
    fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
        read_sized_bytes::<F, 32>(input).map(Self)
    }
}

/// The start of a new block.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct BlockMetadata {
    /// The block id.
    pub id: HashValue,
    /// The consensus round.
    pub round: u64,
    /// When the block was proposed.
    pub timestamp_usecs: u64,
    /// Validators that voted for the previous block.
    pub previous_block_votes: Vec<AccountAddress>,
    /// The validator that proposed the block.
    pub proposer: AccountAddress,
}

/// Anything the network can execute.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Transaction {
    UserTransaction(SignedTransaction),
    GenesisTransaction(WriteSetPayload),
    BlockMetadata(BlockMetadata),
}

impl Transaction {
    /// The hash the network identifies this transaction by.
    pub fn hash(&self) -> HashValue {
        HashValue(sha3_256_concat([
            &TRANSACTION_HASH_SEED[..],
            self.bcs_bytes().as_slice(),
        ]))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use diem_bcs::{from_bytes, to_bytes};
    use hex_literal::hex;

    use super::*;
    use crate::testing_utils::TEST_ADDRESS;

    pub(crate) const RAW_TXN: [u8; 117] = hex!(
        "a8e087ac04e218e61c92b0309a511c5a0700000000000000"
        "0104a11ceb0b0107000000000000000000000000000000010358555303585553"
        "000403f72589b71ff4f8d139674a3f7369c69b0140420f000000000004000400"
        "40420f0000000000000000000000000003585553ec0112600000000002"
    );

    pub(crate) const SIGNATURE: [u8; 64] = hex!(
        "22443f5daa9f1f72bec75865be9854196c3b57318285b377af9d6f527cb3924f"
        "88fea4211e8e6234d0b520a48e6f4cbc38f5fe818f30080362e07b7121315d07"
    );

    pub(crate) const PUBLIC_KEY: [u8; 32] =
        hex!("5ccaa99f85f613f9a93a1f610ea3e2a8b4527542408452aae0e6590a2b46604d");

    pub(crate) fn p2p_transfer() -> RawTransaction {
        RawTransaction {
            sender: AccountAddress::new(TEST_ADDRESS),
            sequence_number: 7,
            payload: TransactionPayload::Script(Script {
                code: hex!("a11ceb0b").to_vec(),
                ty_args: vec![TypeTag::from_currency_code("XUS").unwrap()],
                args: vec![
                    TransactionArgument::Address(AccountAddress::new(hex!(
                        "f72589b71ff4f8d139674a3f7369c69b"
                    ))),
                    TransactionArgument::U64(1_000_000),
                    TransactionArgument::U8Vector(vec![]),
                    TransactionArgument::U8Vector(vec![]),
                ],
            }),
            max_gas_amount: 1_000_000,
            gas_unit_price: 0,
            gas_currency_code: "XUS".into(),
            expiration_timestamp_secs: 1_611_792_876,
            chain_id: ChainId::TESTNET,
        }
    }

    fn signed() -> SignedTransaction {
        SignedTransaction::from_raw_and_signature(
            p2p_transfer(),
            Ed25519PublicKey(PUBLIC_KEY),
            Ed25519Signature(SIGNATURE),
        )
    }

    #[test]
    fn raw_transaction_bytes() {
        assert_eq!(to_bytes(&p2p_transfer()), RAW_TXN);
        assert_eq!(from_bytes::<RawTransaction>(&RAW_TXN).unwrap(), p2p_transfer());
    }

    #[test]
    fn signing_message_is_seeded() {
        let message = p2p_transfer().signing_message();
        assert_eq!(message[..32], RAW_TRANSACTION_HASH_SEED);
        assert_eq!(message[32..], RAW_TXN);
    }

    #[test]
    fn signed_transaction_bytes() {
        let bytes = to_bytes(&signed());
        assert_eq!(bytes.len(), 216);
        assert_eq!(bytes[..117], RAW_TXN);
        assert_eq!(bytes[117..119], [0, 32]);
        assert_eq!(bytes[119..151], PUBLIC_KEY);
        assert_eq!(bytes[151], 64);
        assert_eq!(bytes[152..], SIGNATURE);
        assert_eq!(from_bytes::<SignedTransaction>(&bytes).unwrap(), signed());
    }

    #[test]
    fn verifies_signature() {
        signed().verify_signature().unwrap();

        let mut tampered = signed();
        tampered.raw_txn.sequence_number += 1;
        assert!(matches!(
            tampered.verify_signature(),
            Err(SigningError::BadSignature(_))
        ));
    }

    #[test]
    fn transaction_hash() {
        let expected = "b44e9e32b10c05068135691d4405518fb99379da93b4177b32c8bdb0074f1b4f";
        assert_eq!(signed().hash().to_hex(), expected);
        assert_eq!(
            Transaction::UserTransaction(signed()).hash().to_hex(),
            expected
        );
    }

    #[test]
    fn script_function_payload() {
        let payload = TransactionPayload::ScriptFunction(ScriptFunction {
            module: ModuleId {
                address: AccountAddress::CORE_CODE,
                name: Identifier::new("PaymentScripts").unwrap(),
            },
            function: Identifier::new("peer_to_peer_with_metadata").unwrap(),
            ty_args: vec![TypeTag::from_currency_code("XUS").unwrap()],
            args: vec![to_bytes(&1_000_000u64), to_bytes(&Vec::<u8>::new())],
        });
        let bytes = to_bytes(&payload);
        assert_eq!(bytes[0], 3);
        assert_eq!(from_bytes::<TransactionPayload>(&bytes).unwrap(), payload);
    }

    #[test]
    fn block_metadata() {
        let txn = Transaction::BlockMetadata(BlockMetadata {
            id: HashValue([7; 32]),
            round: 1,
            timestamp_usecs: 2,
            previous_block_votes: vec![AccountAddress::ROOT],
            proposer: AccountAddress::TREASURY,
        });
        let bytes = to_bytes(&txn);
        assert_eq!(bytes[..2], [2, 32]);
        assert_eq!(from_bytes::<Transaction>(&bytes).unwrap(), txn);
    }
}
