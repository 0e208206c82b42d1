//! Account and intent identifiers.
//!
//! An account identifier is the bech32 encoding of an on-chain address
//! together with a subaddress, under a human readable prefix naming the
//! network:
//!
//! ```text
//! tdm1p7ujcndcl7nudzwt8fglhx6wxn08kgs5tm6mz4ustv0tyx
//! ^^^ ^^
//! hrp version 1, then base32(address ‖ subaddress) and the checksum
//! ```
//!
//! An intent identifier is a `diem://` URI naming an account identifier and,
//! optionally, the currency and amount of a payment to it.
//!
//! A DiemID names a user at a VASP domain, as `user@domain`.

use std::{collections::BTreeMap, num::ParseIntError};

use bech32::{u5, FromBase32 as _, ToBase32 as _, Variant};
use diem_sdk_common::{chain_ids, hrp, ACCOUNT_ADDRESS_LENGTH, SUB_ADDRESS_LENGTH};
use log::trace;
use once_cell::sync::Lazy;
use thiserror::Error;
use url::Url;

use crate::{AccountAddress, SubAddress};

/// The only identifier version so far.
pub const IDENTIFIER_VERSION: u8 = 1;

/// URI scheme of intent identifiers.
pub const INTENT_SCHEME: &str = "diem";

// separator, version, base32 of 24 bytes and the checksum
const IDENTIFIER_LENGTH_WITHOUT_HRP: usize = 1 + 1 + 39 + 6;

/// Longest user identifier a DiemID may carry, in characters.
pub const MAX_USER_IDENTIFIER_LENGTH: usize = 64;

/// Longest VASP domain identifier a DiemID may carry, in characters.
pub const MAX_VASP_IDENTIFIER_LENGTH: usize = 63;

/// The identifier prefix each network uses, by chain id.
pub static HRPS: Lazy<BTreeMap<u8, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        (chain_ids::MAINNET, hrp::MAINNET),
        (chain_ids::TESTNET, hrp::TESTNET),
        (chain_ids::DEVNET, hrp::TESTNET),
        (chain_ids::TESTING, hrp::TESTNET),
    ])
});

/// An error that occurs when encoding or decoding an account identifier.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdentifierError {
    /// The identifier has the wrong number of characters for its prefix.
    #[error("account identifier must be {expected} characters, got {actual}")]
    InvalidLength {
        /// The length for the expected prefix.
        expected: usize,
        /// The length given.
        actual: usize,
    },

    /// The identifier is not valid bech32.
    #[error("invalid bech32: {0}")]
    Bech32(#[from] bech32::Error),

    /// The identifier is for another network.
    #[error("expected prefix {expected:?}, got {actual:?}")]
    HrpMismatch {
        /// The prefix asked for.
        expected: String,
        /// The prefix found.
        actual: String,
    },

    /// The identifier uses the bech32m checksum.
    #[error("account identifiers use the original bech32 checksum")]
    UnexpectedVariant,

    /// The identifier version is not one this crate reads.
    #[error("unsupported identifier version {0}")]
    UnsupportedVersion(u8),

    /// The payload is not an address followed by a subaddress.
    #[error("account identifier payload must be 24 bytes, got {0}")]
    InvalidPayloadLength(usize),

    /// Not `user@domain` with both parts short enough and made of
    /// alphanumerics and dots.
    #[error("{0:?} is not a valid DiemID")]
    InvalidDiemId(String),
}

/// An error that occurs when decoding an intent identifier.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    /// Not a URI.
    #[error(transparent)]
    Url(#[from] url::ParseError),

    /// The URI scheme is not `diem`.
    #[error("unknown intent scheme {0:?}")]
    UnknownScheme(String),

    /// The URI has no account identifier.
    #[error("intent has no account identifier")]
    MissingAccount,

    /// The account identifier does not decode.
    #[error("invalid account identifier: {0}")]
    Account(#[from] IdentifierError),

    /// A parameter appears more than once.
    #[error("intent parameter {0:?} appears more than once")]
    RepeatedParam(String),

    /// The amount is not an unsigned integer.
    #[error("invalid intent amount {value:?}")]
    InvalidAmount {
        /// The amount as given.
        value: String,
        /// Why it failed to parse.
        #[source]
        source: ParseIntError,
    },
}

/// Encodes an address and optional subaddress as an account identifier.
///
/// A missing subaddress is written as [`SubAddress::ZERO`], so `None` and
/// `Some(SubAddress::ZERO)` give the same identifier.
pub fn encode_account(
    address: AccountAddress,
    sub_address: Option<SubAddress>,
    hrp: &str,
) -> Result<String, IdentifierError> {
    let sub_address = sub_address.unwrap_or(SubAddress::ZERO);
    let mut payload = Vec::with_capacity(ACCOUNT_ADDRESS_LENGTH + SUB_ADDRESS_LENGTH);
    payload.extend_from_slice(address.as_bytes());
    payload.extend_from_slice(sub_address.as_bytes());

    let mut data = vec![u5::try_from_u8(IDENTIFIER_VERSION)?];
    data.extend(payload.to_base32());
    Ok(bech32::encode(hrp, data, Variant::Bech32)?)
}

/// Decodes an account identifier, which must be under `hrp`.
///
/// The zero subaddress decodes to `None`.
pub fn decode_account(
    s: &str,
    hrp: &str,
) -> Result<(AccountAddress, Option<SubAddress>), IdentifierError> {
    let expected = hrp.len() + IDENTIFIER_LENGTH_WITHOUT_HRP;
    if s.len() != expected {
        return Err(IdentifierError::InvalidLength {
            expected,
            actual: s.len(),
        });
    }

    let (actual, data, variant) = bech32::decode(s)?;
    if actual != hrp {
        return Err(IdentifierError::HrpMismatch {
            expected: hrp.to_owned(),
            actual,
        });
    }
    if variant != Variant::Bech32 {
        return Err(IdentifierError::UnexpectedVariant);
    }

    let (version, data) = data
        .split_first()
        .ok_or(IdentifierError::InvalidPayloadLength(0))?;
    if version.to_u8() != IDENTIFIER_VERSION {
        return Err(IdentifierError::UnsupportedVersion(version.to_u8()));
    }

    let payload = Vec::<u8>::from_base32(data)?;
    if payload.len() != ACCOUNT_ADDRESS_LENGTH + SUB_ADDRESS_LENGTH {
        return Err(IdentifierError::InvalidPayloadLength(payload.len()));
    }
    let (address, sub_address) = payload.split_at(ACCOUNT_ADDRESS_LENGTH);
    let address = AccountAddress::new(address.try_into().expect("split at address length"));
    let sub_address = SubAddress::new(sub_address.try_into().expect("24 bytes less 16"));

    Ok((address, (!sub_address.is_zero()).then_some(sub_address)))
}

/// The address of an account identifier under `hrp`.
pub fn decode_account_address(s: &str, hrp: &str) -> Result<AccountAddress, IdentifierError> {
    decode_account(s, hrp).map(|(address, _)| address)
}

/// The subaddress of an account identifier under `hrp`, if not zero.
pub fn decode_account_subaddress(
    s: &str,
    hrp: &str,
) -> Result<Option<SubAddress>, IdentifierError> {
    decode_account(s, hrp).map(|(_, sub_address)| sub_address)
}

/// The human readable prefix of a bech32 string.
pub fn decode_hrp(s: &str) -> Result<String, IdentifierError> {
    Ok(bech32::decode(s)?.0)
}

fn split_diem_id(s: &str) -> Option<(&str, &str)> {
    let valid = |part: &str, max: usize| {
        part.chars().count() <= max && part.chars().all(|c| c.is_alphanumeric() || c == '.')
    };
    s.split_once('@').filter(|(user, vasp)| {
        valid(user, MAX_USER_IDENTIFIER_LENGTH) && valid(vasp, MAX_VASP_IDENTIFIER_LENGTH)
    })
}

/// Joins a user identifier and a VASP domain identifier into a DiemID.
pub fn create_diem_id(user: &str, vasp_domain: &str) -> Result<String, IdentifierError> {
    let diem_id = format!("{user}@{vasp_domain}");
    match is_diem_id(&diem_id) {
        true => Ok(diem_id),
        false => Err(IdentifierError::InvalidDiemId(diem_id)),
    }
}

/// Whether `s` is a DiemID.
///
/// Everything before the first `@` is the user identifier, everything after
/// it the VASP domain.
pub fn is_diem_id(s: &str) -> bool {
    split_diem_id(s).is_some()
}

/// The user identifier of a DiemID.
pub fn user_identifier_from_diem_id(diem_id: &str) -> Result<&str, IdentifierError> {
    split_diem_id(diem_id)
        .map(|(user, _)| user)
        .ok_or_else(|| IdentifierError::InvalidDiemId(diem_id.to_owned()))
}

/// The VASP domain identifier of a DiemID.
pub fn vasp_identifier_from_diem_id(diem_id: &str) -> Result<&str, IdentifierError> {
    split_diem_id(diem_id)
        .map(|(_, vasp)| vasp)
        .ok_or_else(|| IdentifierError::InvalidDiemId(diem_id.to_owned()))
}

/// A request to pay an account, decoded from an intent identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Intent {
    /// The account to pay.
    pub account_address: AccountAddress,
    /// The user within the account, if custodial.
    pub sub_address: Option<SubAddress>,
    /// The currency to pay in.
    pub currency_code: Option<String>,
    /// The amount to pay.
    pub amount: Option<u64>,
    /// Prefix of the account identifier.
    pub hrp: String,
}

impl Intent {
    /// The account identifier of the payee.
    pub fn account_id(&self) -> Result<String, IdentifierError> {
        encode_account(self.account_address, self.sub_address, &self.hrp)
    }

    /// Encodes this intent as an intent identifier.
    pub fn to_intent_id(&self) -> Result<String, IdentifierError> {
        Ok(encode_intent(
            &self.account_id()?,
            self.currency_code.as_deref(),
            self.amount,
        ))
    }
}

/// Builds an intent identifier. An empty currency code and a zero amount are
/// left out.
pub fn encode_intent(account_id: &str, currency_code: Option<&str>, amount: Option<u64>) -> String {
    let mut params = Vec::new();
    if let Some(code) = currency_code.filter(|code| !code.is_empty()) {
        params.push(format!("c={code}"));
    }
    if let Some(amount) = amount.filter(|amount| *amount > 0) {
        params.push(format!("am={amount}"));
    }

    let mut out = format!("{INTENT_SCHEME}://{account_id}");
    if !params.is_empty() {
        out.push('?');
        out.push_str(&params.join("&"));
    }
    out
}

/// Decodes an intent identifier whose account identifier is under `hrp`.
pub fn decode_intent(s: &str, hrp: &str) -> Result<Intent, IntentError> {
    let url = Url::parse(s)?;
    if url.scheme() != INTENT_SCHEME {
        return Err(IntentError::UnknownScheme(url.scheme().to_owned()));
    }
    let account_id = url.host_str().ok_or(IntentError::MissingAccount)?;
    let (account_address, sub_address) = decode_account(account_id, hrp)?;

    let mut currency_code = None;
    let mut amount = None;
    for (key, value) in url.query_pairs() {
        trace!("intent parameter {key}={value}");
        match key.as_ref() {
            "c" => {
                if currency_code.replace(value.into_owned()).is_some() {
                    return Err(IntentError::RepeatedParam(key.into_owned()));
                }
            }
            "am" => {
                let parsed =
                    value
                        .parse::<u64>()
                        .map_err(|source| IntentError::InvalidAmount {
                            value: value.clone().into_owned(),
                            source,
                        })?;
                if amount.replace(parsed).is_some() {
                    return Err(IntentError::RepeatedParam(key.into_owned()));
                }
            }
            _ => {}
        }
    }

    Ok(Intent {
        account_address,
        sub_address,
        currency_code,
        amount,
        hrp: hrp.to_owned(),
    })
}
