//! Canonical signing message for receipts
//!
//! The message is the receipt's trust-bearing subset serialized as compact
//! JSON:
//! - Subset fields in fixed order (`CANONICAL_FIELDS`), absent fields omitted
//! - Nested objects key-sorted recursively (byte-wise), arrays keep order
//! - No whitespace, `,`/`:` separators, UTF-8 emitted as-is
//!
//! Any drift in this byte form invalidates every existing signature.

use receipt_types::{Receipt, CANONICAL_FIELDS};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Errors from strict canonicalization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    #[error("receipt is missing canonical field '{0}'")]
    MissingField(&'static str),
}

/// Canonical message bytes for a receipt.
pub fn canonicalize(receipt: &Receipt) -> Vec<u8> {
    canonical_string(receipt).into_bytes()
}

/// Canonical message as text.
pub fn canonical_string(receipt: &Receipt) -> String {
    let mut out = String::from("{");
    let mut first = true;

    for field in CANONICAL_FIELDS {
        let Some(value) = receipt.get(field) else {
            continue;
        };
        if !first {
            out.push(',');
        }
        first = false;
        write_string(&mut out, field);
        out.push(':');
        write_value(&mut out, value);
    }

    out.push('}');
    out
}

/// Canonical bytes, refusing receipts that lack any subset field.
///
/// Used when producing signatures: a signature over a partial subset would
/// leave the missing fields unbound.
pub fn canonicalize_strict(receipt: &Receipt) -> Result<Vec<u8>, CanonicalError> {
    if let Some(missing) = CANONICAL_FIELDS
        .iter()
        .copied()
        .find(|f| receipt.get(f).is_none())
    {
        return Err(CanonicalError::MissingField(missing));
    }
    Ok(canonicalize(receipt))
}

/// SHA-256 (hex) of the canonical bytes
pub fn canonical_digest(receipt: &Receipt) -> String {
    hex::encode(Sha256::digest(canonicalize(receipt)))
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Object(map) => write_object(out, map),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(out, item);
            }
            out.push(']');
        }
        // serde_json's compact scalar form: minimal escaping, no ASCII-only escapes
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
    let mut keys: Vec<&String> = map.keys().collect();
    keys.sort();

    out.push('{');
    for (i, key) in keys.into_iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_string(out, key);
        out.push(':');
        write_value(out, &map[key.as_str()]);
    }
    out.push('}');
}

fn write_string(out: &mut String, s: &str) {
    out.push_str(&Value::String(s.to_string()).to_string());
}
