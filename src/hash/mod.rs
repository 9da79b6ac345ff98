//! Artifact content-hash verification
//!
//! Receipts declare `input_hash` / `output_hash` as SHA-256 hex, optionally
//! labelled `sha256:`. The caller supplies the artifact bytes; a declared hash
//! without bytes is skipped rather than failed.

use std::io::{self, Read};

use receipt_types::{HashCheck, HashDetail, Receipt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Label accepted in front of a declared digest
pub const DIGEST_LABEL: &str = "sha256:";

/// Where the salt goes relative to the artifact bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaltMode {
    #[default]
    Prefix,
    Suffix,
}

impl std::str::FromStr for SaltMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prefix" => Ok(Self::Prefix),
            "suffix" => Ok(Self::Suffix),
            other => Err(format!("unknown salt mode '{}', expected prefix or suffix", other)),
        }
    }
}

/// Salt bytes plus placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Salt<'a> {
    pub bytes: &'a [u8],
    pub mode: SaltMode,
}

/// Errors parsing a salt string
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaltError {
    #[error("invalid salt hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Decode a hex salt (optional `0x` prefix)
pub fn parse_salt_hex(salt_hex: &str) -> Result<Vec<u8>, SaltError> {
    let digits = salt_hex.trim();
    let digits = digits.strip_prefix("0x").unwrap_or(digits);
    Ok(hex::decode(digits)?)
}

/// Artifact buffers supplied for one verification call
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtifactInputs<'a> {
    /// Bytes the `input_hash` claim refers to
    pub input: Option<&'a [u8]>,

    /// Bytes the `output_hash` claim refers to
    pub output: Option<&'a [u8]>,

    pub salt: Option<Salt<'a>>,
}

impl<'a> ArtifactInputs<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, bytes: &'a [u8]) -> Self {
        self.input = Some(bytes);
        self
    }

    pub fn output(mut self, bytes: &'a [u8]) -> Self {
        self.output = Some(bytes);
        self
    }

    pub fn salt(mut self, bytes: &'a [u8], mode: SaltMode) -> Self {
        self.salt = Some(Salt { bytes, mode });
        self
    }
}

/// Hex SHA-256 of the artifact with the salt applied
pub fn compute_digest(artifact: &[u8], salt: Option<Salt<'_>>) -> String {
    let mut hasher = Sha256::new();
    match salt {
        Some(Salt {
            bytes,
            mode: SaltMode::Prefix,
        }) => {
            hasher.update(bytes);
            hasher.update(artifact);
        }
        Some(Salt {
            bytes,
            mode: SaltMode::Suffix,
        }) => {
            hasher.update(artifact);
            hasher.update(bytes);
        }
        None => hasher.update(artifact),
    }
    hex::encode(hasher.finalize())
}

/// Strip the optional label and normalize case
pub fn normalize_declared(declared: &str) -> String {
    let lowered = declared.trim().to_lowercase();
    match lowered.strip_prefix(DIGEST_LABEL) {
        Some(rest) => rest.to_string(),
        None => lowered,
    }
}

/// Compare a declared hash against the digest of `artifact`.
pub fn verify_hash(declared: &str, artifact: &[u8], salt: Option<Salt<'_>>) -> bool {
    normalize_declared(declared) == compute_digest(artifact, salt)
}

/// Like [`verify_hash`] but streams the artifact from a reader.
pub fn verify_hash_reader<R: Read>(
    declared: &str,
    mut reader: R,
    salt: Option<Salt<'_>>,
) -> io::Result<bool> {
    let mut hasher = Sha256::new();
    if let Some(Salt {
        bytes,
        mode: SaltMode::Prefix,
    }) = salt
    {
        hasher.update(bytes);
    }

    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    if let Some(Salt {
        bytes,
        mode: SaltMode::Suffix,
    }) = salt
    {
        hasher.update(bytes);
    }

    Ok(normalize_declared(declared) == hex::encode(hasher.finalize()))
}

/// Check every declared hash for which bytes were supplied.
///
/// Fields are visited `input_hash` then `output_hash`. An empty check set is a
/// pass.
pub fn verify_hashes(receipt: &Receipt, inputs: &ArtifactInputs<'_>) -> HashCheck {
    let fields = [("input_hash", inputs.input), ("output_hash", inputs.output)];

    let mut details = Vec::new();
    for (field, bytes) in fields {
        let Some(declared) = receipt.get(field).filter(|v| is_declared(v)) else {
            continue;
        };
        let Some(bytes) = bytes else {
            tracing::debug!(field, "hash declared but no artifact supplied, skipping");
            continue;
        };

        let ok = match declared.as_str() {
            Some(declared) => verify_hash(declared, bytes, inputs.salt),
            None => false,
        };
        tracing::debug!(field, ok, "hash compared");
        details.push(HashDetail {
            field: field.to_string(),
            ok,
        });
    }

    HashCheck::from_details(details)
}

fn is_declared(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
    const HELLO_PREFIX_00FF: &str =
        "fb27efcf0d93b82336b354a5a4b20a100f3a7f5372bdc0104fa561063105bffc";
    const HELLO_SUFFIX_00FF: &str =
        "55dfc00c01f3ea84a2f1472b04669ad3ed588c04bad216e855f24fbe6a84822c";

    #[test]
    fn test_compute_digest_known_vector() {
        assert_eq!(compute_digest(b"hello", None), HELLO_SHA256);
    }

    #[test]
    fn test_declared_normalization() {
        assert!(verify_hash(HELLO_SHA256, b"hello", None));
        assert!(verify_hash(&format!("sha256:{}", HELLO_SHA256), b"hello", None));
        assert!(verify_hash(
            &format!("SHA256:{}", HELLO_SHA256.to_uppercase()),
            b"hello",
            None
        ));
        assert!(verify_hash(&format!("  {}\n", HELLO_SHA256), b"hello", None));
        assert!(!verify_hash(&format!("sha512:{}", HELLO_SHA256), b"hello", None));
        assert!(!verify_hash(HELLO_SHA256, b"hello!", None));
    }

    #[test]
    fn test_salt_modes() {
        let salt = [0x00, 0xff];
        let prefix = Salt {
            bytes: &salt,
            mode: SaltMode::Prefix,
        };
        let suffix = Salt {
            bytes: &salt,
            mode: SaltMode::Suffix,
        };

        assert_eq!(compute_digest(b"hello", Some(prefix)), HELLO_PREFIX_00FF);
        assert_eq!(compute_digest(b"hello", Some(suffix)), HELLO_SUFFIX_00FF);
        assert!(verify_hash(HELLO_PREFIX_00FF, b"hello", Some(prefix)));
        assert!(!verify_hash(HELLO_PREFIX_00FF, b"hello", Some(suffix)));
    }

    #[test]
    fn test_verify_is_idempotent() {
        let results: Vec<bool> = (0..5)
            .map(|_| verify_hash(HELLO_SHA256, b"hello", None))
            .collect();
        assert!(results.iter().all(|r| *r));
    }

    #[test]
    fn test_reader_matches_buffer() {
        let data = vec![7u8; 20_000];
        let declared = compute_digest(&data, None);
        assert!(verify_hash_reader(&declared, data.as_slice(), None).unwrap());

        let salt = [1, 2, 3];
        let salted = Salt {
            bytes: &salt,
            mode: SaltMode::Suffix,
        };
        let declared = compute_digest(&data, Some(salted));
        assert!(verify_hash_reader(&declared, data.as_slice(), Some(salted)).unwrap());
        assert!(!verify_hash_reader(&declared, data.as_slice(), None).unwrap());
    }

    #[test]
    fn test_parse_salt_hex() {
        assert_eq!(parse_salt_hex("00ff").unwrap(), vec![0x00, 0xff]);
        assert_eq!(parse_salt_hex("0x00ff").unwrap(), vec![0x00, 0xff]);
        assert!(parse_salt_hex("xyz").is_err());
    }

    #[test]
    fn test_salt_mode_parse() {
        assert_eq!("prefix".parse::<SaltMode>().unwrap(), SaltMode::Prefix);
        assert_eq!("suffix".parse::<SaltMode>().unwrap(), SaltMode::Suffix);
        assert!("middle".parse::<SaltMode>().is_err());
        assert_eq!(SaltMode::default(), SaltMode::Prefix);
    }

    fn receipt_with_hashes(input: Value, output: Value) -> Receipt {
        Receipt::from_value(json!({"input_hash": input, "output_hash": output})).unwrap()
    }

    #[test]
    fn test_verify_hashes_vacuous_pass_without_bytes() {
        let receipt = receipt_with_hashes(json!(HELLO_SHA256), json!("0".repeat(64)));
        let check = verify_hashes(&receipt, &ArtifactInputs::new());
        assert!(check.ok);
        assert!(check.details.is_empty());
    }

    #[test]
    fn test_verify_hashes_checks_supplied_fields_in_order() {
        let receipt = receipt_with_hashes(
            json!(format!("sha256:{}", HELLO_SHA256)),
            json!("0".repeat(64)),
        );
        let inputs = ArtifactInputs::new().input(b"hello").output(b"world");
        let check = verify_hashes(&receipt, &inputs);

        assert!(!check.ok);
        assert_eq!(check.details.len(), 2);
        assert_eq!(check.details[0].field, "input_hash");
        assert!(check.details[0].ok);
        assert_eq!(check.details[1].field, "output_hash");
        assert!(!check.details[1].ok);
    }

    #[test]
    fn test_verify_hashes_skips_undeclared() {
        let receipt = receipt_with_hashes(json!(""), json!(null));
        let inputs = ArtifactInputs::new().input(b"hello").output(b"world");
        let check = verify_hashes(&receipt, &inputs);
        assert!(check.ok);
        assert!(check.details.is_empty());

        let receipt = Receipt::from_value(json!({})).unwrap();
        assert!(verify_hashes(&receipt, &inputs).details.is_empty());
    }

    #[test]
    fn test_verify_hashes_non_string_declared_is_mismatch() {
        let receipt = receipt_with_hashes(json!(12345), json!(null));
        let inputs = ArtifactInputs::new().input(b"hello");
        let check = verify_hashes(&receipt, &inputs);
        assert!(!check.ok);
        assert_eq!(check.details.len(), 1);
    }

    #[test]
    fn test_verify_hashes_applies_salt() {
        let salt = [0x00, 0xff];
        let receipt = receipt_with_hashes(json!(HELLO_PREFIX_00FF), json!(HELLO_SUFFIX_00FF));

        let prefix = ArtifactInputs::new()
            .input(b"hello")
            .salt(&salt, SaltMode::Prefix);
        let check = verify_hashes(&receipt, &prefix);
        assert!(check.ok);

        let suffix = ArtifactInputs::new()
            .output(b"hello")
            .salt(&salt, SaltMode::Suffix);
        assert!(verify_hashes(&receipt, &suffix).ok);
    }
}
