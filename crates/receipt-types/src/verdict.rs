//! Aggregate verification verdict

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::checks::{AnchorCheck, HashCheck, SchemaCheck, SignatureCheck};

/// Final PASS/FAIL outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn from_passed(passed: bool) -> Self {
        if passed {
            Self::Pass
        } else {
            Self::Fail
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

/// Results of the four independent checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checks {
    pub schema: SchemaCheck,
    pub anchor: AnchorCheck,
    pub hashes: HashCheck,
    pub signature: SignatureCheck,
}

impl Checks {
    /// Boolean outcome of each check, as consumed by the trust scorer
    pub fn parts(&self) -> TrustParts {
        TrustParts {
            schema: self.schema.ok,
            hashes: self.hashes.ok,
            signature: self.signature.ok,
            anchor: self.anchor.ok,
        }
    }
}

/// Pass/fail flag per scored category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustParts {
    pub schema: bool,
    pub hashes: bool,
    pub signature: bool,
    pub anchor: bool,
}

/// Verification result for one receipt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationVerdict {
    pub verdict: Verdict,
    pub checks: Checks,

    /// Weighted 0..=100 summary of which checks passed
    pub trust_score: u8,
}

impl VerificationVerdict {
    pub fn passed(&self) -> bool {
        self.verdict.is_pass()
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
