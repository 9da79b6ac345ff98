//! Signing primitive seam
//!
//! Verification delegates the curve arithmetic to a [`SignaturePrimitive`].
//! Whether one is available at all is a [`SigningCapability`] chosen when the
//! verifier is built.

use std::fmt;
use std::sync::Arc;

use ed25519_dalek::{Signature, VerifyingKey};
use thiserror::Error;

/// The one algorithm receipts may be signed with
pub const SUPPORTED_ALGORITHM: &str = "ed25519";

/// Ed25519 public key length in bytes
pub const PUBLIC_KEY_LEN: usize = 32;

/// Ed25519 signature length in bytes
pub const SIGNATURE_LEN: usize = 64;

/// Errors from a primitive's verify operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// The signature does not verify under the key
    #[error("signature rejected")]
    Rejected,

    #[error("malformed public key: {0}")]
    MalformedKey(String),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Verify-only view of a signature scheme
pub trait SignaturePrimitive: Send + Sync {
    /// Algorithm name as it appears in receipts (lowercase)
    fn algorithm(&self) -> &'static str;

    /// Verify `signature` over `message` under `public_key`
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8])
        -> Result<(), PrimitiveError>;
}

/// Ed25519 via `ed25519-dalek`
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Primitive;

impl SignaturePrimitive for Ed25519Primitive {
    fn algorithm(&self) -> &'static str {
        SUPPORTED_ALGORITHM
    }

    fn verify(
        &self,
        public_key: &[u8],
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), PrimitiveError> {
        let key_bytes: [u8; PUBLIC_KEY_LEN] = public_key.try_into().map_err(|_| {
            PrimitiveError::MalformedKey(format!(
                "expected {} bytes, got {}",
                PUBLIC_KEY_LEN,
                public_key.len()
            ))
        })?;
        let verifying_key = VerifyingKey::from_bytes(&key_bytes)
            .map_err(|e| PrimitiveError::MalformedKey(e.to_string()))?;
        // A small-order key admits signatures that verify for every message.
        if verifying_key.is_weak() {
            return Err(PrimitiveError::MalformedKey("small-order public key".to_string()));
        }

        if signature.len() != SIGNATURE_LEN {
            return Err(PrimitiveError::MalformedSignature(format!(
                "expected {} bytes, got {}",
                SIGNATURE_LEN,
                signature.len()
            )));
        }
        let signature = Signature::from_slice(signature)
            .map_err(|e| PrimitiveError::MalformedSignature(e.to_string()))?;

        verifying_key
            .verify_strict(message, &signature)
            .map_err(|_| PrimitiveError::Rejected)
    }
}

/// Whether a signing primitive is installed
#[derive(Clone)]
pub enum SigningCapability {
    Available(Arc<dyn SignaturePrimitive>),
    Unavailable,
}

impl SigningCapability {
    /// The built-in Ed25519 primitive
    pub fn ed25519() -> Self {
        Self::Available(Arc::new(Ed25519Primitive))
    }

    pub fn primitive(&self) -> Option<&dyn SignaturePrimitive> {
        match self {
            Self::Available(primitive) => Some(primitive.as_ref()),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}

impl Default for SigningCapability {
    fn default() -> Self {
        Self::ed25519()
    }
}

impl fmt::Debug for SigningCapability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available(primitive) => write!(f, "Available({})", primitive.algorithm()),
            Self::Unavailable => write!(f, "Unavailable"),
        }
    }
}
