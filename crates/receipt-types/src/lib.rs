//! Receipt verification data model
//!
//! Defines the receipt document, anchor references, per-check results and the
//! aggregate verdict shared by the verification library and its front-ends.

pub mod checks;
pub mod receipt;
pub mod verdict;

pub use checks::{AnchorCheck, HashCheck, HashDetail, SchemaCheck, SignatureCheck, SignatureReason};
pub use receipt::{ProofRef, Receipt, ReceiptError, CANONICAL_FIELDS};
pub use verdict::{Checks, TrustParts, Verdict, VerificationVerdict};
