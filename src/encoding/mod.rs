//! Decoding of key and signature strings
//!
//! Receipts in the wild carry keys and signatures either as hex (optionally
//! `0x`-prefixed) or as base64 (standard or URL-safe alphabet, padded or not).
//! Hex is tried first: its alphabet is a strict subset of base64's, so a
//! string that parses as hex is never reinterpreted.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::engine::GeneralPurpose;
use base64::Engine;
use thiserror::Error;

/// Base64 engines tried after hex, in order
const BASE64_ENGINES: [&GeneralPurpose; 4] = [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD];

/// Errors decoding a key or signature string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    #[error("empty value")]
    Empty,

    #[error("value is neither hex nor base64: {0}")]
    Undecodable(String),
}

/// Which encoding a value was decoded from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Hex,
    Base64,
}

/// Decode a hex or base64 string to raw bytes.
pub fn decode_flexible(value: &str) -> Result<Vec<u8>, EncodingError> {
    decode_with_encoding(value).map(|(bytes, _)| bytes)
}

/// Decode, also reporting which encoding matched.
pub fn decode_with_encoding(value: &str) -> Result<(Vec<u8>, Encoding), EncodingError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(EncodingError::Empty);
    }

    if let Some(bytes) = decode_hex(value) {
        return Ok((bytes, Encoding::Hex));
    }

    let mut first_error = None;
    for engine in BASE64_ENGINES {
        match engine.decode(value) {
            Ok(bytes) => return Ok((bytes, Encoding::Base64)),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    Err(EncodingError::Undecodable(
        first_error.map(|e| e.to_string()).unwrap_or_default(),
    ))
}

fn decode_hex(value: &str) -> Option<Vec<u8>> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);

    if digits.is_empty() || digits.len() % 2 != 0 {
        return None;
    }
    if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    hex::decode(digits).ok()
}
