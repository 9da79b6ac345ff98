//! Receipt documents and anchor references.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Trust-bearing receipt fields, in the order they are serialized for signing.
pub const CANONICAL_FIELDS: [&str; 6] = [
    "id",
    "issued_at",
    "input_hash",
    "output_hash",
    "model_version",
    "policy_version",
];

/// Errors loading a receipt document
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("receipt must be a JSON object, got {0}")]
    NotAnObject(&'static str),
}

/// A receipt: a JSON object making a claim about an input/output pair.
///
/// The document is kept as an untyped map. Verification never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Receipt {
    fields: Map<String, Value>,
}

impl Receipt {
    /// Wrap an already-parsed JSON object
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build from an arbitrary JSON value, rejecting anything but an object
    pub fn from_value(value: Value) -> Result<Self, ReceiptError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(ReceiptError::NotAnObject(json_type_name(&other))),
        }
    }

    /// Parse from JSON text
    pub fn from_json(json: &str) -> Result<Self, ReceiptError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Load from file
    pub fn from_file(path: &Path) -> Result<Self, ReceiptError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.fields)
    }

    /// All top-level fields
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Clone the receipt into a JSON value (for structural validation)
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a top-level field as a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }

    /// Receipt identifier, when present as a string
    pub fn id(&self) -> Option<&str> {
        self.get_str("id")
    }

    /// The `signature` object, if the receipt carries one as a JSON object
    pub fn signature_object(&self) -> Option<&Map<String, Value>> {
        self.fields.get("signature").and_then(Value::as_object)
    }

    /// The raw `proof_refs` value
    pub fn proof_refs(&self) -> Option<&Value> {
        self.fields.get("proof_refs")
    }

    /// Replace (or add) a top-level field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.fields.insert(key.into(), value)
    }
}

impl TryFrom<Value> for Receipt {
    type Error = ReceiptError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(value)
    }
}

impl From<Receipt> for Value {
    fn from(receipt: Receipt) -> Self {
        Value::Object(receipt.fields)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// External attestation reference (`proof_refs[]` entry), borrowed from the
/// receipt.
///
/// Values are not inspected; ledger validity is out of scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofRef<'a> {
    /// Anchor kind (the `type` key)
    pub kind: &'a Value,

    /// Ledger or network name
    pub network: &'a Value,

    /// Transaction or record identifier on that network
    pub tx: &'a Value,
}

impl<'a> ProofRef<'a> {
    /// Keys every proof reference must carry
    pub const REQUIRED_KEYS: [&'static str; 3] = ["type", "network", "tx"];

    /// View an entry as a proof reference; `None` unless it is an object
    /// holding every required key.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            kind: map.get("type")?,
            network: map.get("network")?,
            tx: map.get("tx")?,
        })
    }
}
