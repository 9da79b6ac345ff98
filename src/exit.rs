//! Process exit codes

use receipt_types::{SchemaCheck, Verdict};
use serde::{Deserialize, Serialize};

/// Stable exit codes of the `receipt-verify` binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(i32)]
pub enum ExitCode {
    /// Verification passed (or a non-verifying command succeeded)
    Pass = 0,
    /// Bad arguments, unreadable input, invalid configuration
    Usage = 1,
    /// Verification ran and failed
    VerificationFailed = 2,
}

impl ExitCode {
    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    pub fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(ExitCode::Pass),
            1 => Some(ExitCode::Usage),
            2 => Some(ExitCode::VerificationFailed),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ExitCode::Pass)
    }
}

impl From<Verdict> for ExitCode {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => ExitCode::Pass,
            Verdict::Fail => ExitCode::VerificationFailed,
        }
    }
}

impl From<&SchemaCheck> for ExitCode {
    fn from(check: &SchemaCheck) -> Self {
        if check.ok {
            ExitCode::Pass
        } else {
            ExitCode::VerificationFailed
        }
    }
}
