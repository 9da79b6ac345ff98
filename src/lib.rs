//! Offline verification of signed model receipts
//!
//! A receipt is a JSON document claiming that a model produced an output from
//! an input under a policy. This crate checks such a claim without network
//! access: structure against a JSON Schema, declared SHA-256 artifact hashes,
//! a detached Ed25519 signature over a canonical field subset, and the shape of
//! any ledger anchor references. The outcome is a PASS/FAIL verdict plus a
//! weighted trust score.

pub mod anchor;
pub mod canonical;
pub mod config;
pub mod encoding;
pub mod exit;
pub mod hash;
pub mod pipeline;
pub mod schema;
pub mod score;
pub mod signature;

pub use receipt_types::{
    AnchorCheck, Checks, HashCheck, HashDetail, ProofRef, Receipt, ReceiptError, SchemaCheck,
    SignatureCheck, SignatureReason, TrustParts, Verdict, VerificationVerdict, CANONICAL_FIELDS,
};

pub use anchor::check_anchor;
pub use canonical::{canonical_digest, canonical_string, canonicalize, canonicalize_strict, CanonicalError};
pub use config::{ConfigError, EffectiveConfig, VerifierSettings};
pub use exit::ExitCode;
pub use hash::{verify_hash, verify_hashes, ArtifactInputs, SaltMode};
pub use pipeline::{verify_receipt, PipelineError, SignaturePolicy, Verifier};
pub use schema::{check_schema, SchemaAdapter, SchemaError};
pub use score::{score, TrustWeights};
pub use signature::{verify_signature, SignatureOverrides, SignatureVerifier, SigningCapability};
