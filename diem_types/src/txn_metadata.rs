//! Building and reading payment metadata bytes.

use diem_bcs::{from_bytes, to_bytes, DeserializeError, Encode};
use log::debug;
use thiserror::Error;

use crate::{
    metadata::{
        CoinTradeMetadataV0, GeneralMetadataV0, Metadata, RefundMetadataV0, RefundReason,
        StructuredMetadata, TravelRuleMetadataV0,
    },
    AccountAddress, SubAddress,
};

/// Appended to an encoded [`Attest`] to form the message a receiver signs.
pub const ATTEST_SUFFIX: &[u8] = b"@@$$DIEM_ATTEST$$@@";

/// Failure to build a refund from the metadata of the payment being refunded.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidEventMetadataForRefund {
    /// The metadata bytes are not metadata at all.
    #[error("event metadata does not decode: {0}")]
    Undecodable(#[from] DeserializeError),

    /// Only payments carrying general metadata can be refunded this way.
    #[error("cannot build a refund from metadata of kind {0}")]
    NotGeneralMetadata(u32),
}

/// What the receiver of a travel rule payment attests to.
#[derive(Clone, Debug, PartialEq, Eq, Encode)]
pub struct Attest {
    /// The metadata the payment will carry.
    pub metadata: Metadata,
    /// The paying account.
    pub sender_address: AccountAddress,
    /// The amount paid.
    pub amount: u64,
}

impl Attest {
    /// `BCS(self) ‖ "@@$$DIEM_ATTEST$$@@"`.
    pub fn signing_message(&self) -> Vec<u8> {
        let mut out = self.bcs_bytes();
        out.extend_from_slice(ATTEST_SUFFIX);
        out
    }
}

/// General metadata for a transfer between custodial accounts.
///
/// Leave `from_subaddress` empty when paying from a non-custodial account,
/// and `to_subaddress` empty when paying to one.
pub fn general_metadata(
    from_subaddress: Option<SubAddress>,
    to_subaddress: Option<SubAddress>,
    referenced_event: Option<u64>,
) -> Vec<u8> {
    to_bytes(&Metadata::from(GeneralMetadataV0 {
        to_subaddress: to_subaddress.map(|it| it.as_bytes().to_vec()),
        from_subaddress: from_subaddress.map(|it| it.as_bytes().to_vec()),
        referenced_event,
    }))
}

/// Travel rule metadata, and the message the receiver signs to attest to it.
pub fn travel_rule(
    off_chain_reference_id: &str,
    sender_address: AccountAddress,
    amount: u64,
) -> (Vec<u8>, Vec<u8>) {
    let metadata = Metadata::from(TravelRuleMetadataV0 {
        off_chain_reference_id: Some(off_chain_reference_id.to_owned()),
    });
    let attest = Attest {
        metadata,
        sender_address,
        amount,
    };
    (to_bytes(&attest.metadata), attest.signing_message())
}

/// Metadata refunding the payment at `transaction_version`.
pub fn refund_metadata(transaction_version: u64, reason: RefundReason) -> Vec<u8> {
    to_bytes(&Metadata::from(RefundMetadataV0 {
        transaction_version,
        reason,
    }))
}

/// Metadata settling the given off-chain trades.
pub fn coin_trade_metadata<S: Into<String>>(trade_ids: impl IntoIterator<Item = S>) -> Vec<u8> {
    to_bytes(&Metadata::from(CoinTradeMetadataV0 {
        trade_ids: trade_ids.into_iter().map(Into::into).collect(),
    }))
}

/// Metadata for refunding the payment that emitted an event.
///
/// The subaddresses swap places, and the refund references the event. A
/// payment without metadata (between two non-custodial accounts) is refunded
/// without metadata.
pub fn refund_metadata_from_event(
    event_metadata: &[u8],
    event_sequence_number: u64,
) -> Result<Vec<u8>, InvalidEventMetadataForRefund> {
    if event_metadata.is_empty() {
        return Ok(vec![]);
    }
    let metadata = from_bytes::<Metadata>(event_metadata)?;
    let kind = metadata.type_index();
    match metadata.into_structure() {
        Some(StructuredMetadata::General(general)) => Ok(to_bytes(&Metadata::from(
            GeneralMetadataV0 {
                to_subaddress: general.from_subaddress,
                from_subaddress: general.to_subaddress,
                referenced_event: Some(event_sequence_number),
            },
        ))),
        _ => Err(InvalidEventMetadataForRefund::NotGeneralMetadata(kind)),
    }
}

/// The structured payload of encoded metadata.
///
/// Returns `None` for empty input, for bytes that are not metadata, and for
/// kinds without a structured payload.
pub fn decode_structure(bytes: &[u8]) -> Option<StructuredMetadata> {
    if bytes.is_empty() {
        return None;
    }
    match from_bytes::<Metadata>(bytes) {
        Ok(metadata) => metadata.into_structure(),
        Err(e) => {
            debug!("ignoring undecodable metadata {}: {e}", hex::encode(bytes));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use hex_literal::hex;

    use super::*;
    use crate::testing_utils::common_setup;

    fn sub_address(s: &str) -> SubAddress {
        SubAddress::from_hex(s).unwrap()
    }

    #[test]
    fn travel_rule_metadata() {
        let (metadata, signing_msg) = travel_rule(
            "off chain reference id",
            AccountAddress::from_hex("f72589b71ff4f8d139674a3f7369c69b").unwrap(),
            1000,
        );
        assert_eq!(
            hex::encode(metadata),
            "020001166f666620636861696e207265666572656e6365206964"
        );
        assert_eq!(
            hex::encode(signing_msg),
            "020001166f666620636861696e207265666572656e6365206964f72589b71ff4f8d139674a3f7369c69be803000000000000404024244449454d5f41545445535424244040"
        );
    }

    #[test]
    fn general_metadata_bytes() {
        assert_eq!(general_metadata(None, None, None), hex!("0100000000"));
        assert_eq!(
            general_metadata(None, Some(sub_address("8f8b82153010a1bd")), None),
            hex!("010001088f8b82153010a1bd0000")
        );
        assert_eq!(
            general_metadata(Some(sub_address("8f8b82153010a1bd")), None, None),
            hex!("01000001088f8b82153010a1bd00")
        );
        assert_eq!(
            general_metadata(
                Some(sub_address("8f8b82153010a1bd")),
                Some(sub_address("111111153010a111")),
                None
            ),
            hex!("01000108111111153010a11101088f8b82153010a1bd00")
        );
    }

    #[test]
    fn refund_and_coin_trade_bytes() {
        assert_eq!(
            refund_metadata(12343, RefundReason::UserInitiatedFullRefund),
            hex!("0400373000000000000003")
        );

        let trade = coin_trade_metadata(["abc", "efg"]);
        assert_eq!(trade, hex!("0500020361626303656667"));
        assert_eq!(
            decode_structure(&trade),
            Some(StructuredMetadata::CoinTrade(CoinTradeMetadataV0 {
                trade_ids: vec!["abc".into(), "efg".into()]
            }))
        );
    }

    #[test]
    fn decodes_structure() {
        common_setup();

        assert_eq!(decode_structure(b""), None);
        assert_eq!(decode_structure(b"hello world"), None);
        assert!(matches!(
            decode_structure(&hex!("010001088f8b82153010a1bd0000")),
            Some(StructuredMetadata::General(_))
        ));
        assert!(matches!(
            decode_structure(&hex!(
                "020001166f666620636861696e207265666572656e6365206964"
            )),
            Some(StructuredMetadata::TravelRule(_))
        ));
        assert!(matches!(
            decode_structure(&hex!("0400373000000000000003")),
            Some(StructuredMetadata::Refund(_))
        ));
        assert!(matches!(
            decode_structure(&hex!("050000")),
            Some(StructuredMetadata::CoinTrade(_))
        ));
        // unstructured bytes
        assert_eq!(decode_structure(&hex!("03010461626364")), None);
        // payment metadata is not a kind this crate knows
        assert_eq!(
            decode_structure(&hex!("0600ffb6a935ab074dc2a47ee5c178d9d0ca")),
            None
        );
    }

    #[test]
    fn refund_from_event_swaps_subaddresses() {
        let refund =
            refund_metadata_from_event(&hex!("010001088f8b82153010a1bd0000"), 5).unwrap();
        assert_eq!(
            refund,
            general_metadata(Some(sub_address("8f8b82153010a1bd")), None, Some(5))
        );
        assert_eq!(
            refund,
            hex!("01000001088f8b82153010a1bd010500000000000000")
        );

        assert_eq!(refund_metadata_from_event(&[], 5), Ok(vec![]));
        assert_eq!(
            refund_metadata_from_event(&hex!("0400373000000000000003"), 5),
            Err(InvalidEventMetadataForRefund::NotGeneralMetadata(4))
        );
        assert!(matches!(
            refund_metadata_from_event(b"hello world", 5),
            Err(InvalidEventMetadataForRefund::Undecodable(_))
        ));
    }
}
