//! Per-check results
//!
//! Each check of the pipeline produces one of these values. They are plain
//! data: constructed once, never mutated, serialized into the verdict.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural (JSON Schema) check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaCheck {
    /// True iff the validator reported no errors
    pub ok: bool,

    /// Error messages, ordered by instance path
    pub errors: Vec<String>,
}

impl SchemaCheck {
    /// Build from an ordered error list
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }
}

/// Anchor (`proof_refs`) shape check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorCheck {
    pub ok: bool,

    /// Number of proof references inspected
    pub count: usize,
}

/// Outcome for one declared hash field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashDetail {
    /// Receipt field name (`input_hash` or `output_hash`)
    pub field: String,

    pub ok: bool,
}

/// Artifact hash check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashCheck {
    /// True iff every checked field matched (vacuously true when none were checked)
    pub ok: bool,

    pub details: Vec<HashDetail>,
}

impl HashCheck {
    /// Aggregate per-field results
    pub fn from_details(details: Vec<HashDetail>) -> Self {
        Self {
            ok: details.iter().all(|d| d.ok),
            details,
        }
    }
}

/// Stable failure reasons for the signature check.
///
/// These strings are part of the output contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignatureReason {
    /// No public key or no signature value could be resolved
    NotProvided,
    /// Algorithm is not the supported one
    AlgUnsupported,
    /// The signing primitive rejected the signature
    BadSignature,
    /// Decoding or the verify call itself failed
    VerifyError,
    /// No signing primitive is available in this build/configuration
    NotImplemented,
}

impl SignatureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotProvided => "not_provided",
            Self::AlgUnsupported => "alg_unsupported",
            Self::BadSignature => "bad_signature",
            Self::VerifyError => "verify_error",
            Self::NotImplemented => "not_implemented",
        }
    }
}

impl fmt::Display for SignatureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signature check result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureCheck {
    pub ok: bool,

    /// Failure reason (absent on success)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<SignatureReason>,

    /// Underlying error description for `verify_error`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SignatureCheck {
    /// A verified signature
    pub fn verified() -> Self {
        Self {
            ok: true,
            reason: None,
            error: None,
        }
    }

    /// A failure with a named reason
    pub fn failed(reason: SignatureReason) -> Self {
        Self {
            ok: false,
            reason: Some(reason),
            error: None,
        }
    }

    /// A `verify_error` failure carrying the underlying description
    pub fn verify_error(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(SignatureReason::VerifyError),
            error: Some(error.into()),
        }
    }
}
