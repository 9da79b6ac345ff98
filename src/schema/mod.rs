//! Structural (JSON Schema) validation of receipts
//!
//! The validator itself is an external engine behind [`StructuralValidator`].
//! This module only normalizes its output: errors are ordered by instance
//! path so error lists diff cleanly across runs, then reduced to messages.

use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::Path;

use jsonschema::Draft;
use receipt_types::{Receipt, SchemaCheck};
use serde_json::Value;
use thiserror::Error;

/// Receipt schema bundled with the library, used when none is configured
pub const DEFAULT_RECEIPT_SCHEMA: &str = include_str!("receipt.schema.json");

/// Errors preparing a schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("I/O error reading schema: {0}")]
    Io(#[from] io::Error),

    #[error("schema is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid JSON schema: {0}")]
    InvalidSchema(String),
}

/// One structural violation reported by a validator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralError {
    /// JSON pointer to the offending instance location ("" for the root)
    pub path: String,

    /// Human-readable description
    pub message: String,
}

/// An external structural validator
pub trait StructuralValidator: Send + Sync {
    /// Return every violation of `instance`; empty means valid
    fn validate(&self, instance: &Value) -> Vec<StructuralError>;
}

/// Draft 2020-12 validator backed by the `jsonschema` crate
pub struct JsonSchemaValidator {
    validator: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compile a schema document
    pub fn new(schema: &Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|e| SchemaError::InvalidSchema(e.to_string()))?;
        Ok(Self { validator })
    }

    /// Compile the bundled receipt schema
    pub fn receipt_default() -> Result<Self, SchemaError> {
        let schema: Value = serde_json::from_str(DEFAULT_RECEIPT_SCHEMA)?;
        Self::new(&schema)
    }

    /// Load and compile a schema file
    pub fn from_file(path: &Path) -> Result<Self, SchemaError> {
        let json = fs::read_to_string(path)?;
        let schema: Value = serde_json::from_str(&json)?;
        Self::new(&schema)
    }
}

impl StructuralValidator for JsonSchemaValidator {
    fn validate(&self, instance: &Value) -> Vec<StructuralError> {
        self.validator
            .iter_errors(instance)
            .map(|error| StructuralError {
                path: error.instance_path.to_string(),
                message: error.to_string(),
            })
            .collect()
    }
}

/// Wraps a validator and produces [`SchemaCheck`] results
pub struct SchemaAdapter {
    validator: Box<dyn StructuralValidator>,
}

impl SchemaAdapter {
    pub fn new(validator: Box<dyn StructuralValidator>) -> Self {
        Self { validator }
    }

    /// Adapter over a JSON Schema document
    pub fn from_document(schema: &Value) -> Result<Self, SchemaError> {
        Ok(Self::new(Box::new(JsonSchemaValidator::new(schema)?)))
    }

    /// Adapter over the bundled receipt schema
    pub fn receipt_default() -> Result<Self, SchemaError> {
        Ok(Self::new(Box::new(JsonSchemaValidator::receipt_default()?)))
    }

    /// Validate a receipt
    pub fn check(&self, receipt: &Receipt) -> SchemaCheck {
        let mut errors = self.validator.validate(&receipt.to_value());
        sort_by_path(&mut errors);

        let check = SchemaCheck::from_errors(errors.into_iter().map(|e| e.message).collect());
        tracing::debug!(ok = check.ok, errors = check.errors.len(), "schema check");
        check
    }
}

/// Validate a receipt against a schema document in one call.
pub fn check_schema(receipt: &Receipt, schema: &Value) -> Result<SchemaCheck, SchemaError> {
    Ok(SchemaAdapter::from_document(schema)?.check(receipt))
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum PathSegment {
    Index(usize),
    Key(String),
}

fn parse_pointer(pointer: &str) -> Vec<PathSegment> {
    pointer
        .split('/')
        .skip(1)
        .map(|raw| {
            let segment = raw.replace("~1", "/").replace("~0", "~");
            match segment.parse::<usize>() {
                Ok(index) if segment.bytes().all(|b| b.is_ascii_digit()) => {
                    PathSegment::Index(index)
                }
                _ => PathSegment::Key(segment),
            }
        })
        .collect()
}

fn compare_paths(a: &str, b: &str) -> Ordering {
    parse_pointer(a).cmp(&parse_pointer(b))
}

/// Stable sort by instance path; array indices compare numerically.
fn sort_by_path(errors: &mut [StructuralError]) {
    errors.sort_by(|a, b| compare_paths(&a.path, &b.path));
}
