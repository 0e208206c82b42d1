use diem_bcs::{from_bytes, to_bytes};
use diem_types::{
    transaction::{
        ChainId, Ed25519PublicKey, Ed25519Signature, Module, RawTransaction, Script,
        SignedTransaction, TransactionArgument, TransactionPayload,
    },
    type_tag::{StructTag, TypeTag},
    utils, AccountAddress, AuthKey,
};
use ed25519_dalek::SigningKey;
use proptest::prelude::*;

fn arb_address() -> impl Strategy<Value = AccountAddress> {
    any::<[u8; 16]>().prop_map(AccountAddress::new)
}

fn arb_currency_code() -> impl Strategy<Value = String> {
    "[ -~]{1,8}"
}

fn arb_identifier_code() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9]{0,7}"
}

fn arb_type_tag() -> impl Strategy<Value = TypeTag> {
    let leaf = prop_oneof![
        Just(TypeTag::Bool),
        Just(TypeTag::U8),
        Just(TypeTag::U64),
        Just(TypeTag::U128),
        Just(TypeTag::Address),
        Just(TypeTag::Signer),
        arb_identifier_code().prop_map(|code| TypeTag::from_currency_code(&code).unwrap()),
    ];
    leaf.prop_recursive(4, 16, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|tag| TypeTag::Vector(Box::new(tag))),
            (arb_address(), proptest::collection::vec(inner, 0..3)).prop_map(
                |(address, type_params)| {
                    let TypeTag::Struct(tag) = TypeTag::from_currency_code("Coin").unwrap() else {
                        unreachable!()
                    };
                    TypeTag::Struct(StructTag {
                        address,
                        type_params,
                        ..tag
                    })
                }
            ),
        ]
    })
}

fn arb_argument() -> impl Strategy<Value = TransactionArgument> {
    prop_oneof![
        any::<u8>().prop_map(TransactionArgument::U8),
        any::<u64>().prop_map(TransactionArgument::U64),
        any::<u128>().prop_map(TransactionArgument::U128),
        arb_address().prop_map(TransactionArgument::Address),
        proptest::collection::vec(any::<u8>(), 0..40).prop_map(TransactionArgument::U8Vector),
        any::<bool>().prop_map(TransactionArgument::Bool),
    ]
}

fn arb_payload() -> impl Strategy<Value = TransactionPayload> {
    prop_oneof![
        (
            proptest::collection::vec(any::<u8>(), 0..64),
            proptest::collection::vec(arb_type_tag(), 0..3),
            proptest::collection::vec(arb_argument(), 0..5),
        )
            .prop_map(|(code, ty_args, args)| TransactionPayload::Script(Script {
                code,
                ty_args,
                args
            })),
        proptest::collection::vec(any::<u8>(), 0..64)
            .prop_map(|code| TransactionPayload::Module(Module { code })),
    ]
}

prop_compose! {
    fn arb_raw_transaction()(
        sender in arb_address(),
        sequence_number in any::<u64>(),
        payload in arb_payload(),
        max_gas_amount in any::<u64>(),
        gas_unit_price in any::<u64>(),
        gas_currency_code in arb_currency_code(),
        expiration_timestamp_secs in any::<u64>(),
        chain_id in any::<u8>(),
    ) -> RawTransaction {
        RawTransaction {
            sender,
            sequence_number,
            payload,
            max_gas_amount,
            gas_unit_price,
            gas_currency_code,
            expiration_timestamp_secs,
            chain_id: ChainId(chain_id),
        }
    }
}

proptest! {
    #[test]
    fn raw_transactions_round_trip(txn in arb_raw_transaction()) {
        let bytes = to_bytes(&txn);
        prop_assert_eq!(from_bytes::<RawTransaction>(&bytes).unwrap(), txn.clone());
        prop_assert_eq!(to_bytes(&from_bytes::<RawTransaction>(&bytes).unwrap()), bytes);
    }

    #[test]
    fn signed_transactions_round_trip(
        txn in arb_raw_transaction(),
        public_key in any::<[u8; 32]>(),
        signature in proptest::collection::vec(any::<u8>(), 64),
    ) {
        let signed = SignedTransaction::from_raw_and_signature(
            txn,
            Ed25519PublicKey(public_key),
            Ed25519Signature(signature.try_into().unwrap()),
        );
        prop_assert_eq!(from_bytes::<SignedTransaction>(&to_bytes(&signed)).unwrap(), signed);
    }

    #[test]
    fn signatures_verify(txn in arb_raw_transaction(), secret in any::<[u8; 32]>()) {
        let account = diem_types::local_account::LocalAccount::new(
            SigningKey::from_bytes(&secret),
            SigningKey::from_bytes(&[1; 32]),
        );
        let signed = account.sign(txn);
        prop_assert!(signed.verify_signature().is_ok());
        prop_assert_eq!(signed.authenticator.auth_key(), account.auth_key());
    }

    #[test]
    fn auth_key_splits_into_prefix_and_address(secret in any::<[u8; 32]>()) {
        let public_key = SigningKey::from_bytes(&secret).verifying_key();
        let auth_key = AuthKey::from_public_key(&public_key);

        let mut joined = auth_key.prefix().to_vec();
        joined.extend_from_slice(auth_key.account_address().as_bytes());
        prop_assert_eq!(joined.as_slice(), auth_key.as_bytes().as_slice());
        prop_assert_eq!(auth_key, AuthKey::from_public_key_bytes(&public_key.to_bytes()));
    }

    #[test]
    fn currency_codes_round_trip(code in arb_currency_code()) {
        let tag = utils::currency_code(&code).unwrap();
        prop_assert_eq!(utils::type_tag_to_str(&tag).unwrap(), code);
    }

    #[test]
    fn identifier_currency_tags_round_trip(code in arb_identifier_code()) {
        let tag = utils::currency_code(&code).unwrap();
        prop_assert_eq!(from_bytes::<TypeTag>(&to_bytes(&tag)).unwrap(), tag);
    }

    #[test]
    fn addresses_round_trip_through_hex(address in arb_address()) {
        prop_assert_eq!(utils::account_address(&address.to_hex()).unwrap(), address);
        prop_assert_eq!(address.to_string().parse::<AccountAddress>().unwrap(), address);
    }
}
