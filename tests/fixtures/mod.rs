//! Shared receipt fixtures
//!
//! The signed fixture is pinned: seed `[0x01; 32]` over the receipt below
//! produces `SIGNATURE_B64` under `PUBLIC_KEY_HEX`.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const SEED_HEX: &str = "0101010101010101010101010101010101010101010101010101010101010101";

pub const PUBLIC_KEY_HEX: &str =
    "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c";

pub const SIGNATURE_B64: &str =
    "OPAUa72HI97Dbx3BVNCVLSeUWJ1jOvgrmSCrRsYuejiUXezdsgKhM+t8nnzGqZ2tVqHT+SnBFjT1u1c6KjnKBw==";

/// SHA-256 of the fixture's canonical message
pub const CANONICAL_SHA256: &str =
    "df6443c1b7c0a8ae7797e1392340cca4708eb541ec0cc50911a56a60862a0d12";

/// SHA-256 of `b"hello"`
pub const HELLO_SHA256: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

/// SHA-256 of `b"world"`
pub const WORLD_SHA256: &str = "486ea46224d1bb4fb680f34f7c9ad96a8f24ec88be73ea8e5a6c65260e9cb8a7";

/// SHA-256 of `00ff || b"hello"`
pub const HELLO_SALTED_PREFIX: &str =
    "fb27efcf0d93b82336b354a5a4b20a100f3a7f5372bdc0104fa561063105bffc";

/// SHA-256 of `b"hello" || 00ff`
pub const HELLO_SALTED_SUFFIX: &str =
    "55dfc00c01f3ea84a2f1472b04669ad3ed588c04bad216e855f24fbe6a84822c";

/// The unsigned fixture receipt
pub fn unsigned_receipt() -> Value {
    json!({
        "id": "rec1",
        "issued_at": "2025-01-01T00:00:00Z",
        "input_hash": format!("sha256:{}", "a".repeat(64)),
        "output_hash": "b".repeat(64),
        "model_version": "m1",
        "policy_version": "p1"
    })
}

/// The fixture receipt with its pinned signature
pub fn signed_receipt() -> Value {
    let mut receipt = unsigned_receipt();
    receipt["signature"] = json!({
        "alg": "ed25519",
        "kid": format!("ed25519:{}", PUBLIC_KEY_HEX),
        "sig": SIGNATURE_B64
    });
    receipt
}

/// A receipt whose hashes commit to `b"hello"` (input) and `b"world"` (output)
pub fn hashed_receipt() -> Value {
    let mut receipt = unsigned_receipt();
    receipt["input_hash"] = json!(format!("sha256:{}", HELLO_SHA256));
    receipt["output_hash"] = json!(WORLD_SHA256);
    receipt
}

/// Write a JSON value into `dir` and return the path
pub fn write_json(dir: &Path, name: &str, value: &Value) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, serde_json::to_string_pretty(value).unwrap()).unwrap();
    path
}

/// Write raw bytes into `dir` and return the path
pub fn write_bytes(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}
