//! Typed view of the merged configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::hash::SaltMode;
use crate::pipeline::SignaturePolicy;

/// Resolved verifier settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerifierSettings {
    pub verdict: VerdictSettings,
    pub hashes: HashSettings,
    pub signature: SignatureSettings,
    pub schema: SchemaSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VerdictSettings {
    pub signature_policy: SignaturePolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HashSettings {
    pub salt_mode: SaltMode,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SignatureSettings {
    /// `false` runs as if no signing primitive were installed
    pub enabled: bool,
}

impl Default for SignatureSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaSettings {
    /// Schema document to validate against; the bundled schema when unset
    pub path: Option<PathBuf>,
}
