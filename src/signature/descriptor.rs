//! Resolution of the heterogeneous `signature` object
//!
//! Receipts have carried their signature under several field-name
//! conventions. Each of algorithm, key and signature is resolved through an
//! ordered list of extractors; the first one yielding a non-empty string wins
//! and the result is tagged with where it came from.

use std::fmt;

use receipt_types::Receipt;
use serde_json::{Map, Value};

/// Algorithm assumed when nothing names one
pub const DEFAULT_ALGORITHM: &str = "ed25519";

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// Supplied by the caller
    Override,
    /// Split out of the `kid` field (`"<alg>:<key>"`)
    Kid,
    /// Read from the named field of the signature object
    Field(&'static str),
    /// Nothing matched; built-in default
    Default,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Override => f.write_str("override"),
            Self::Kid => f.write_str("kid"),
            Self::Field(name) => f.write_str(name),
            Self::Default => f.write_str("default"),
        }
    }
}

/// A resolved string and its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tagged<'a> {
    pub value: &'a str,
    pub source: Source,
}

/// Caller-supplied values that take precedence over the receipt
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureOverrides<'a> {
    pub public_key: Option<&'a str>,
    pub signature: Option<&'a str>,
    pub algorithm: Option<&'a str>,
}

impl<'a> SignatureOverrides<'a> {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn public_key(mut self, value: &'a str) -> Self {
        self.public_key = Some(value);
        self
    }

    pub fn signature(mut self, value: &'a str) -> Self {
        self.signature = Some(value);
        self
    }

    pub fn algorithm(mut self, value: &'a str) -> Self {
        self.algorithm = Some(value);
        self
    }
}

type Extractor = for<'a> fn(&'a Map<String, Value>) -> Option<Tagged<'a>>;

const ALGORITHM_EXTRACTORS: &[Extractor] = &[from_alg, from_algo, from_algorithm, from_kid_prefix];

const KEY_EXTRACTORS: &[Extractor] = &[
    from_kid_key,
    from_public_key,
    from_public_key_camel,
    from_pubkey,
    from_key,
];

const SIGNATURE_EXTRACTORS: &[Extractor] =
    &[from_sig, from_signature, from_signature_b64, from_value];

macro_rules! field_extractor {
    ($($name:ident => $field:literal),* $(,)?) => {
        $(
            fn $name(obj: &Map<String, Value>) -> Option<Tagged<'_>> {
                field(obj, $field)
            }
        )*
    };
}

field_extractor! {
    from_alg => "alg",
    from_algo => "algo",
    from_algorithm => "algorithm",
    from_public_key => "public_key",
    from_public_key_camel => "publicKey",
    from_pubkey => "pubkey",
    from_key => "key",
    from_sig => "sig",
    from_signature => "signature",
    from_signature_b64 => "signature_b64",
    from_value => "value",
}

fn from_kid_prefix(obj: &Map<String, Value>) -> Option<Tagged<'_>> {
    kid_parts(obj).map(|(alg, _)| alg)
}

fn from_kid_key(obj: &Map<String, Value>) -> Option<Tagged<'_>> {
    kid_parts(obj).map(|(_, key)| key)
}

fn field<'a>(obj: &'a Map<String, Value>, name: &'static str) -> Option<Tagged<'a>> {
    obj.get(name)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(|value| Tagged {
            value,
            source: Source::Field(name),
        })
}

fn kid_parts(obj: &Map<String, Value>) -> Option<(Tagged<'_>, Tagged<'_>)> {
    let kid = obj.get("kid").and_then(Value::as_str)?;
    let (alg, key) = kid.split_once(':')?;
    if alg.is_empty() || key.is_empty() {
        return None;
    }
    Some((
        Tagged {
            value: alg,
            source: Source::Kid,
        },
        Tagged {
            value: key,
            source: Source::Kid,
        },
    ))
}

fn resolve<'a>(
    override_value: Option<&'a str>,
    obj: Option<&'a Map<String, Value>>,
    extractors: &[Extractor],
) -> Option<Tagged<'a>> {
    if let Some(value) = override_value.filter(|s| !s.is_empty()) {
        return Some(Tagged {
            value,
            source: Source::Override,
        });
    }
    let obj = obj?;
    extractors.iter().find_map(|extract| extract(obj))
}

/// Algorithm, key and signature strings resolved for one verification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureDescriptor<'a> {
    pub algorithm: Tagged<'a>,
    pub public_key: Option<Tagged<'a>>,
    pub signature: Option<Tagged<'a>>,
    /// Algorithm prefix of `kid` when the key was taken from it
    pub kid_algorithm: Option<&'a str>,
}

impl<'a> SignatureDescriptor<'a> {
    /// Resolve from caller overrides first, then the receipt's `signature` object.
    ///
    /// A `signature` field that is not an object contributes nothing.
    pub fn resolve(receipt: &'a Receipt, overrides: &SignatureOverrides<'a>) -> Self {
        let obj = receipt.signature_object();

        let algorithm = resolve(overrides.algorithm, obj, ALGORITHM_EXTRACTORS).unwrap_or(Tagged {
            value: DEFAULT_ALGORITHM,
            source: Source::Default,
        });

        let public_key = resolve(overrides.public_key, obj, KEY_EXTRACTORS);
        let kid_algorithm = public_key
            .filter(|key| key.source == Source::Kid)
            .and(obj)
            .and_then(kid_parts)
            .map(|(alg, _)| alg.value);

        Self {
            algorithm,
            public_key,
            signature: resolve(overrides.signature, obj, SIGNATURE_EXTRACTORS),
            kid_algorithm,
        }
    }

    /// Whether the algorithm names `expected` (ASCII case-insensitive).
    ///
    /// A key taken from `kid` must also carry `expected` as its prefix, so an
    /// `alg` field cannot relabel a key issued for another scheme.
    pub fn algorithm_is(&self, expected: &str) -> bool {
        let names = |value: &str| value.trim().eq_ignore_ascii_case(expected);
        names(self.algorithm.value) && self.kid_algorithm.map_or(true, names)
    }
}
