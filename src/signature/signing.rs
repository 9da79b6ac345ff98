//! Ed25519 signing of receipts
//!
//! Counterpart of the verifier, used by the `sign` and `keygen` commands and
//! by tests. Signs the strict canonical subset and attaches a
//! `{alg, kid, sig}` signature object.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use receipt_types::Receipt;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use super::primitive::SUPPORTED_ALGORITHM;
use crate::canonical::{canonicalize_strict, CanonicalError};

/// Errors from signing operations
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("invalid seed: {0}")]
    InvalidSeed(String),

    #[error(transparent)]
    Canonical(#[from] CanonicalError),
}

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// Text encoding used for the emitted signature value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureEncoding {
    #[default]
    Base64,
    Hex,
}

impl SignatureEncoding {
    pub fn encode(&self, bytes: &[u8]) -> String {
        match self {
            Self::Base64 => STANDARD.encode(bytes),
            Self::Hex => hex::encode(bytes),
        }
    }
}

impl std::str::FromStr for SignatureEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "base64" => Ok(Self::Base64),
            "hex" => Ok(Self::Hex),
            other => Err(format!("unknown encoding '{}', expected base64 or hex", other)),
        }
    }
}

/// Generate a fresh signing key
pub fn generate_keypair() -> SigningKey {
    SigningKey::generate(&mut rand::thread_rng())
}

/// Build a signing key from a 32-byte hex seed (optional `0x`)
pub fn signing_key_from_seed_hex(seed_hex: &str) -> SigningResult<SigningKey> {
    let digits = seed_hex.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    let bytes = hex::decode(digits).map_err(|e| SigningError::InvalidSeed(e.to_string()))?;
    let seed: [u8; 32] = bytes
        .as_slice()
        .try_into()
        .map_err(|_| SigningError::InvalidSeed(format!("expected 32 bytes, got {}", bytes.len())))?;
    Ok(SigningKey::from_bytes(&seed))
}

/// `kid` value for a verifying key: `ed25519:<hex>`
pub fn kid_for(key: &VerifyingKey) -> String {
    format!("{}:{}", SUPPORTED_ALGORITHM, hex::encode(key.as_bytes()))
}

/// Sign a receipt, returning a copy carrying the signature object.
///
/// Any existing `signature` field is replaced. Fails if a canonical field is
/// missing.
pub fn sign_receipt(
    receipt: &Receipt,
    signing_key: &SigningKey,
    encoding: SignatureEncoding,
) -> SigningResult<Receipt> {
    let message = canonicalize_strict(receipt)?;
    let signature = signing_key.sign(&message);

    let mut signed = receipt.clone();
    signed.insert(
        "signature",
        json!({
            "alg": SUPPORTED_ALGORITHM,
            "kid": kid_for(&signing_key.verifying_key()),
            "sig": encoding.encode(&signature.to_bytes()),
        }),
    );

    tracing::debug!(id = receipt.id(), "receipt signed");
    Ok(signed)
}
