//! A peer to peer payment with travel rule metadata, from key to hash.

use diem_bcs::{from_bytes, to_bytes};
use diem_types::{
    account_state::{AccountResource, AccountStateBlob, AccountStateError},
    identifier,
    local_account::{LocalAccount, LocalAccountConfig},
    metadata::{Metadata, StructuredMetadata},
    transaction::{
        ChainId, ScriptFunction, SignedTransaction, Transaction, TransactionPayload,
    },
    txn_metadata,
    type_tag::{Identifier, ModuleId, TypeTag},
    utils, AccountAddress, AuthKey, LegacyAccountAddress, SubAddress,
};
use static_assertions::assert_impl_all;

assert_impl_all!(AccountAddress: Send, Sync);
assert_impl_all!(SignedTransaction: Send, Sync);
assert_impl_all!(AccountResource: Send, Sync);
assert_impl_all!(Metadata: Send, Sync);
assert_impl_all!(LocalAccount: Send, Sync);
assert_impl_all!(AccountStateError: Send, Sync, std::error::Error);

const SENDER_KEY: &str = "ab70ae3aa603641f049a3356927d0ba836f775e862f559073a6281782479fd1e";

fn init() {
    // Try init since multiple tests calling `init` will cause an error.
    let _ = pretty_env_logger::try_init();
}

fn sender() -> anyhow::Result<LocalAccount> {
    let config: LocalAccountConfig = serde_json::from_value(serde_json::json!({
        "private_key": SENDER_KEY,
        "txn_gas_currency_code": "XUS",
    }))?;
    Ok(LocalAccount::from_config(&config)?)
}

#[test]
fn travel_rule_payment() -> anyhow::Result<()> {
    init();

    let sender = sender()?;
    assert_eq!(
        sender.account_address(),
        utils::account_address("a8e087ac04e218e61c92b0309a511c5a")?
    );

    let receiver_id = "tdm1p7ujcndcl7nudzwt8fglhx6wxn08kgs5tm6mz4ustv0tyx";
    let intent = identifier::decode_intent(
        &identifier::encode_intent(receiver_id, Some("XUS"), Some(2_000_000)),
        "tdm",
    )?;
    let amount = intent.amount.unwrap_or_default();

    let (metadata, signing_msg) =
        txn_metadata::travel_rule("ref id", sender.account_address(), amount);
    assert!(signing_msg.starts_with(&metadata));
    assert!(signing_msg.ends_with(txn_metadata::ATTEST_SUFFIX));

    let payload = TransactionPayload::ScriptFunction(ScriptFunction {
        module: ModuleId {
            address: AccountAddress::CORE_CODE,
            name: Identifier::new("PaymentScripts")?,
        },
        function: Identifier::new("peer_to_peer_with_metadata")?,
        ty_args: vec![TypeTag::from_currency_code("XUS")?],
        args: vec![
            to_bytes(&intent.account_address),
            to_bytes(&amount),
            to_bytes(&metadata),
            to_bytes(&sender.sign_compliance_message(&signing_msg).to_vec()),
        ],
    });
    let signed = sender.create_transaction(0, payload, ChainId::TESTNET, 1_611_792_846)?;
    signed.verify_signature()?;

    let submitted = to_bytes(&signed);
    let received = from_bytes::<SignedTransaction>(&submitted)?;
    assert_eq!(received, signed);
    assert_eq!(
        utils::transaction_hash(&received),
        Transaction::UserTransaction(signed).hash().to_hex()
    );

    let TransactionPayload::ScriptFunction(call) = &received.raw_txn.payload else {
        panic!("payload changed in transit");
    };
    assert!(matches!(
        txn_metadata::decode_structure(&from_bytes::<Vec<u8>>(&call.args[2])?),
        Some(StructuredMetadata::TravelRule(_))
    ));
    Ok(())
}

#[test]
fn refund_of_a_custodial_payment() -> anyhow::Result<()> {
    let from = SubAddress::from_hex("8f8b82153010a1bd")?;
    let to = SubAddress::from_hex("111111153010a111")?;
    let paid = txn_metadata::general_metadata(Some(from), Some(to), None);

    let refund = txn_metadata::refund_metadata_from_event(&paid, 42)?;
    let Some(StructuredMetadata::General(general)) = txn_metadata::decode_structure(&refund)
    else {
        panic!("refund is not general metadata");
    };
    assert_eq!(general.from_subaddress.as_deref(), Some(&to.as_bytes()[..]));
    assert_eq!(general.to_subaddress.as_deref(), Some(&from.as_bytes()[..]));
    assert_eq!(general.referenced_event, Some(42));
    Ok(())
}

#[test]
fn account_state_of_new_and_existing_accounts() -> anyhow::Result<()> {
    init();

    let address = LegacyAccountAddress::from_hex(
        "deadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeefdeadbeef",
    )?;
    let fresh = AccountResource::from_state_blob(address, &[])?;
    assert_eq!(fresh.authentication_key, AuthKey::new(address.into_bytes()));
    assert_eq!(fresh.sent_events.count, 0);

    // a blob that exists but holds no resources
    let no_resources = [0, 0, 0, 0];
    assert!(AccountStateBlob::from_bytes(&no_resources)?.is_empty());
    assert_eq!(
        AccountResource::from_state_blob(address, &no_resources),
        Err(AccountStateError::MissingAccountResource)
    );
    assert!(AccountResource::from_state_blob(address, b"deadbeef").is_err());
    Ok(())
}
