use diem_bcs::{read_sized_bytes, write_bytes, Decode, Encode, Format, PResult};
use diem_sdk_common::{ED25519_PUBLIC_KEY_LENGTH, ED25519_SIGNATURE_LENGTH};
use ed25519_dalek::{Signature, SignatureError, Verifier as _, VerifyingKey};
use thiserror::Error;

use crate::{type_tag::TypeTagError, AuthKey};

/// Failure to sign a transaction or to check a signature.
#[derive(Debug, Error)]
pub enum SigningError {
    /// The public key bytes are not a valid Ed25519 point.
    #[error("invalid Ed25519 public key")]
    InvalidPublicKey(#[source] SignatureError),

    /// The signature does not verify against the message.
    #[error("signature verification failed")]
    BadSignature(#[source] SignatureError),

    /// Only single Ed25519 signatures can be checked locally.
    #[error("cannot verify multi-signature authenticators")]
    UnsupportedScheme,

    /// The configured private key is not 32 bytes of hex.
    #[error("invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// The configured gas currency is not a currency code.
    #[error(transparent)]
    GasCurrency(#[from] TypeTagError),
}

/// Raw Ed25519 public key bytes, written as a length-prefixed byte string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519PublicKey(pub [u8; ED25519_PUBLIC_KEY_LENGTH]);

/// Raw Ed25519 signature bytes, written as a length-prefixed byte string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ed25519Signature(pub [u8; ED25519_SIGNATURE_LENGTH]);

/// Concatenated member keys followed by the threshold byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultiEd25519PublicKey(pub Vec<u8>);

/// Concatenated signatures followed by the 4-byte signer bitmap.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MultiEd25519Signature(pub Vec<u8>);

macro_rules! sized_bytes_codec {
    ($($ty:ident => $len:expr),*) => {
        $(
            impl Encode for $ty {
                fn encode<F: Format>(&self, out: &mut Vec<u8>) {
                    write_bytes::<F>(out, &self.0)
                }
            }

            impl Decode for $ty {
                fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
                    read_sized_bytes::<F, { $len }>(input).map(Self)
                }
            }
        )*
    };
}

sized_bytes_codec!(
    Ed25519PublicKey => ED25519_PUBLIC_KEY_LENGTH,
    Ed25519Signature => ED25519_SIGNATURE_LENGTH
);

macro_rules! bytes_codec {
    ($($ty:ident),*) => {
        $(
            impl Encode for $ty {
                fn encode<F: Format>(&self, out: &mut Vec<u8>) {
                    self.0.encode::<F>(out)
                }
            }

            impl Decode for $ty {
                fn decode<F: Format>(input: &mut &[u8]) -> PResult<Self> {
                    Vec::decode::<F>(input).map(Self)
                }
            }
        )*
    };
}

bytes_codec!(MultiEd25519PublicKey, MultiEd25519Signature);

impl From<&VerifyingKey> for Ed25519PublicKey {
    fn from(key: &VerifyingKey) -> Self {
        Self(key.to_bytes())
    }
}

impl From<Signature> for Ed25519Signature {
    fn from(signature: Signature) -> Self {
        Self(signature.to_bytes())
    }
}

/// Proof that the sender authorized a transaction.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Encode, Decode)]
pub enum TransactionAuthenticator {
    /// A single Ed25519 signature.
    Ed25519 {
        /// The signer's key.
        public_key: Ed25519PublicKey,
        /// The signature over the signing message.
        signature: Ed25519Signature,
    },
    /// A k-of-n Ed25519 multisignature.
    MultiEd25519 {
        /// The member keys and threshold.
        public_key: MultiEd25519PublicKey,
        /// The member signatures and bitmap.
        signature: MultiEd25519Signature,
    },
}

impl TransactionAuthenticator {
    /// The authentication key the signer's account must have.
    pub fn auth_key(&self) -> AuthKey {
        match self {
            Self::Ed25519 { public_key, .. } => AuthKey::from_public_key_bytes(&public_key.0),
            Self::MultiEd25519 { public_key, .. } => {
                AuthKey::from_multi_public_key_bytes(&public_key.0)
            }
        }
    }

    /// Checks the signature over `message`.
    pub fn verify(&self, message: &[u8]) -> Result<(), SigningError> {
        match self {
            Self::Ed25519 {
                public_key,
                signature,
            } => {
                let key = VerifyingKey::from_bytes(&public_key.0)
                    .map_err(SigningError::InvalidPublicKey)?;
                key.verify(message, &Signature::from_bytes(&signature.0))
                    .map_err(SigningError::BadSignature)
            }
            Self::MultiEd25519 { .. } => Err(SigningError::UnsupportedScheme),
        }
    }
}
