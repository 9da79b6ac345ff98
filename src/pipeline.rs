//! Verification orchestration
//!
//! Runs the four checks independently over one receipt and combines them
//! into a verdict and a trust score:
//! - Schema (structural validation)
//! - Anchor (`proof_refs` shape)
//! - Hashes (declared digests vs supplied artifacts)
//! - Signature (detached Ed25519 over the canonical subset)
//!
//! No check short-circuits another. Whether the signature gates the verdict
//! is decided by the [`SignaturePolicy`].

use std::fmt;

use receipt_types::{Checks, Receipt, SchemaCheck, Verdict, VerificationVerdict};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::anchor::check_anchor;
use crate::config::VerifierSettings;
use crate::hash::{verify_hashes, ArtifactInputs};
use crate::schema::{JsonSchemaValidator, SchemaAdapter, SchemaError};
use crate::score::{score_with, TrustWeights};
use crate::signature::{SignatureOverrides, SignatureVerifier, SigningCapability};

/// Whether the signature check takes part in the verdict
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignaturePolicy {
    /// Signature only contributes to the trust score
    #[default]
    Informational,
    /// A failed signature check fails the verdict
    Gating,
}

impl fmt::Display for SignaturePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Informational => write!(f, "informational"),
            Self::Gating => write!(f, "gating"),
        }
    }
}

impl std::str::FromStr for SignaturePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "informational" => Ok(Self::Informational),
            "gating" => Ok(Self::Gating),
            other => Err(format!(
                "unknown signature policy '{}', expected informational or gating",
                other
            )),
        }
    }
}

/// Errors constructing a verifier
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

/// Receipt verifier
///
/// Holds the compiled schema, the signing capability and the policy. All
/// verification methods take `&self`; a verifier can be shared across threads.
pub struct Verifier {
    schema: SchemaAdapter,
    signatures: SignatureVerifier,
    policy: SignaturePolicy,
    weights: TrustWeights,
}

impl Verifier {
    /// Verifier over an explicit schema document
    pub fn new(schema: &Value) -> Result<Self, PipelineError> {
        Ok(Self::with_adapter(SchemaAdapter::from_document(schema)?))
    }

    /// Verifier over the bundled receipt schema
    pub fn with_default_schema() -> Result<Self, PipelineError> {
        Ok(Self::with_adapter(SchemaAdapter::receipt_default()?))
    }

    /// Verifier over any schema adapter
    pub fn with_adapter(schema: SchemaAdapter) -> Self {
        Self {
            schema,
            signatures: SignatureVerifier::default(),
            policy: SignaturePolicy::default(),
            weights: TrustWeights::default(),
        }
    }

    /// Build from resolved settings
    pub fn from_settings(settings: &VerifierSettings) -> Result<Self, PipelineError> {
        let schema = match &settings.schema.path {
            Some(path) => SchemaAdapter::new(Box::new(JsonSchemaValidator::from_file(path)?)),
            None => SchemaAdapter::receipt_default()?,
        };

        let capability = if settings.signature.enabled {
            SigningCapability::ed25519()
        } else {
            SigningCapability::Unavailable
        };

        Ok(Self::with_adapter(schema)
            .with_policy(settings.verdict.signature_policy)
            .with_capability(capability))
    }

    pub fn with_policy(mut self, policy: SignaturePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_capability(mut self, capability: SigningCapability) -> Self {
        self.signatures = SignatureVerifier::new(capability);
        self
    }

    pub fn with_weights(mut self, weights: TrustWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn policy(&self) -> SignaturePolicy {
        self.policy
    }

    /// Run every check and build the verdict.
    pub fn verify_receipt(
        &self,
        receipt: &Receipt,
        inputs: &ArtifactInputs<'_>,
        overrides: &SignatureOverrides<'_>,
    ) -> VerificationVerdict {
        let checks = Checks {
            schema: self.schema.check(receipt),
            anchor: check_anchor(receipt),
            hashes: verify_hashes(receipt, inputs),
            signature: self.signatures.verify(receipt, overrides),
        };

        let mut passed = checks.schema.ok && checks.anchor.ok && checks.hashes.ok;
        if self.policy == SignaturePolicy::Gating {
            passed &= checks.signature.ok;
        }

        let verdict = VerificationVerdict {
            verdict: Verdict::from_passed(passed),
            trust_score: score_with(checks.parts(), &self.weights),
            checks,
        };

        tracing::info!(
            id = receipt.id(),
            verdict = %verdict.verdict,
            trust_score = verdict.trust_score,
            policy = %self.policy,
            "receipt verified"
        );
        verdict
    }

    /// Structural check alone
    pub fn check_schema_only(&self, receipt: &Receipt) -> SchemaCheck {
        self.schema.check(receipt)
    }
}

/// Verify against the bundled schema with default settings.
pub fn verify_receipt(
    receipt: &Receipt,
    inputs: &ArtifactInputs<'_>,
) -> Result<VerificationVerdict, PipelineError> {
    Ok(Verifier::with_default_schema()?.verify_receipt(
        receipt,
        inputs,
        &SignatureOverrides::none(),
    ))
}
