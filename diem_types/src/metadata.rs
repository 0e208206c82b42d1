//! Metadata attached to peer to peer payments.
//!
//! Every kind except [`Metadata::Undefined`] and
//! [`Metadata::UnstructuredBytesMetadata`] wraps a versioned enum, so that a
//! new layout can be added without changing the kind's index.

use diem_bcs::{Decode, Encode};

/// Payment metadata, by kind.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum Metadata {
    /// No metadata.
    Undefined,
    /// Subaddresses of a custodial transfer.
    GeneralMetadata(GeneralMetadata),
    /// The off-chain reference for a transfer above the travel rule
    /// threshold.
    TravelRuleMetadata(TravelRuleMetadata),
    /// Application-defined bytes.
    UnstructuredBytesMetadata(UnstructuredBytesMetadata),
    /// A refund of an earlier payment.
    RefundMetadata(RefundMetadata),
    /// Settlement of off-chain trades.
    CoinTradeMetadata(CoinTradeMetadata),
}

/// Versions of [`GeneralMetadataV0`].
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum GeneralMetadata {
    GeneralMetadataVersion0(GeneralMetadataV0),
}

/// Subaddresses identifying the users behind a custodial transfer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct GeneralMetadataV0 {
    /// The receiving user.
    pub to_subaddress: Option<Vec<u8>>,
    /// The sending user.
    pub from_subaddress: Option<Vec<u8>>,
    /// The sequence number of the event this payment refers to.
    pub referenced_event: Option<u64>,
}

/// Versions of [`TravelRuleMetadataV0`].
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum TravelRuleMetadata {
    TravelRuleMetadataVersion0(TravelRuleMetadataV0),
}

/// Identifies the off-chain exchange of travel rule data for a payment.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct TravelRuleMetadataV0 {
    /// The reference id of the off-chain exchange.
    pub off_chain_reference_id: Option<String>,
}

/// Bytes with no structure the network knows of.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct UnstructuredBytesMetadata {
    /// The bytes.
    pub metadata: Option<Vec<u8>>,
}

/// Versions of [`RefundMetadataV0`].
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum RefundMetadata {
    RefundMetadataV0(RefundMetadataV0),
}

/// Refers a refund to the payment it returns.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub struct RefundMetadataV0 {
    /// The version of the refunded transaction.
    pub transaction_version: u64,
    /// Why it is refunded.
    pub reason: RefundReason,
}

/// Why a payment is refunded.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum RefundReason {
    OtherReason,
    InvalidSubaddress,
    UserInitiatedPartialRefund,
    UserInitiatedFullRefund,
}

/// Versions of [`CoinTradeMetadataV0`].
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum CoinTradeMetadata {
    CoinTradeMetadataV0(CoinTradeMetadataV0),
}

/// The off-chain trades a payment settles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Encode, Decode)]
pub struct CoinTradeMetadataV0 {
    /// The trade ids.
    pub trade_ids: Vec<String>,
}

/// The payload of a structured metadata kind, with the version wrapper
/// removed.
#[allow(missing_docs)]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum StructuredMetadata {
    General(GeneralMetadataV0),
    TravelRule(TravelRuleMetadataV0),
    Refund(RefundMetadataV0),
    CoinTrade(CoinTradeMetadataV0),
}

impl Metadata {
    /// The kind's wire index.
    pub fn type_index(&self) -> u32 {
        match self {
            Self::Undefined => 0,
            Self::GeneralMetadata(_) => 1,
            Self::TravelRuleMetadata(_) => 2,
            Self::UnstructuredBytesMetadata(_) => 3,
            Self::RefundMetadata(_) => 4,
            Self::CoinTradeMetadata(_) => 5,
        }
    }

    /// The structured payload, for the kinds that have one.
    pub fn decode_structure(&self) -> Option<StructuredMetadata> {
        self.clone().into_structure()
    }

    /// Like [`Metadata::decode_structure`], without cloning.
    pub fn into_structure(self) -> Option<StructuredMetadata> {
        match self {
            Self::GeneralMetadata(GeneralMetadata::GeneralMetadataVersion0(it)) => {
                Some(StructuredMetadata::General(it))
            }
            Self::TravelRuleMetadata(TravelRuleMetadata::TravelRuleMetadataVersion0(it)) => {
                Some(StructuredMetadata::TravelRule(it))
            }
            Self::RefundMetadata(RefundMetadata::RefundMetadataV0(it)) => {
                Some(StructuredMetadata::Refund(it))
            }
            Self::CoinTradeMetadata(CoinTradeMetadata::CoinTradeMetadataV0(it)) => {
                Some(StructuredMetadata::CoinTrade(it))
            }
            Self::Undefined | Self::UnstructuredBytesMetadata(_) => None,
        }
    }
}

impl From<GeneralMetadataV0> for Metadata {
    fn from(it: GeneralMetadataV0) -> Self {
        Self::GeneralMetadata(GeneralMetadata::GeneralMetadataVersion0(it))
    }
}

impl From<TravelRuleMetadataV0> for Metadata {
    fn from(it: TravelRuleMetadataV0) -> Self {
        Self::TravelRuleMetadata(TravelRuleMetadata::TravelRuleMetadataVersion0(it))
    }
}

impl From<RefundMetadataV0> for Metadata {
    fn from(it: RefundMetadataV0) -> Self {
        Self::RefundMetadata(RefundMetadata::RefundMetadataV0(it))
    }
}

impl From<CoinTradeMetadataV0> for Metadata {
    fn from(it: CoinTradeMetadataV0) -> Self {
        Self::CoinTradeMetadata(CoinTradeMetadata::CoinTradeMetadataV0(it))
    }
}
