//! Weighted trust score

use receipt_types::TrustParts;

/// Fractional weight per category; a passing category contributes
/// `weight * 100` points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrustWeights {
    pub schema: f64,
    pub hashes: f64,
    pub signature: f64,
    pub anchor: f64,
}

impl Default for TrustWeights {
    fn default() -> Self {
        Self {
            schema: 0.50,
            hashes: 0.40,
            signature: 0.05,
            anchor: 0.05,
        }
    }
}

/// Score with the default weights
pub fn score(parts: TrustParts) -> u8 {
    score_with(parts, &TrustWeights::default())
}

/// Score with explicit weights, rounded half away from zero and clamped to 0..=100.
pub fn score_with(parts: TrustParts, weights: &TrustWeights) -> u8 {
    let award = |passed: bool, weight: f64| if passed { weight * 100.0 } else { 0.0 };

    let total = award(parts.schema, weights.schema)
        + award(parts.hashes, weights.hashes)
        + award(parts.signature, weights.signature)
        + award(parts.anchor, weights.anchor);

    total.round().clamp(0.0, 100.0) as u8
}
