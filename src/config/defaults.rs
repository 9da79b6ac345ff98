//! Built-in defaults (layer 1)

use serde::{Deserialize, Serialize};

use crate::hash::SaltMode;
use crate::pipeline::SignaturePolicy;

/// Built-in default configuration values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuiltinDefaults {
    /// Signature gating (default: informational)
    pub signature_policy: SignaturePolicy,

    /// Salt placement for artifact hashing (default: prefix)
    pub salt_mode: SaltMode,

    /// Whether the signing primitive is installed (default: true)
    pub signature_enabled: bool,
}

impl Default for BuiltinDefaults {
    fn default() -> Self {
        Self {
            signature_policy: SignaturePolicy::Informational,
            salt_mode: SaltMode::Prefix,
            signature_enabled: true,
        }
    }
}

impl BuiltinDefaults {
    /// Convert to JSON Value for merging
    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({
            "verdict": {
                "signature_policy": self.signature_policy
            },
            "hashes": {
                "salt_mode": self.salt_mode
            },
            "signature": {
                "enabled": self.signature_enabled
            },
            "schema": {}
        })
    }
}
