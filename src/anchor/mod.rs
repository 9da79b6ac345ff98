//! Anchor reference shape check
//!
//! Only the structure of `proof_refs` is checked. Nothing here contacts a
//! ledger.

use receipt_types::{AnchorCheck, ProofRef, Receipt};
use serde_json::Value;

/// Check that every `proof_refs` entry carries `type`, `network` and `tx`.
pub fn check_anchor(receipt: &Receipt) -> AnchorCheck {
    let check = match receipt.proof_refs() {
        None | Some(Value::Null) => AnchorCheck { ok: true, count: 0 },
        Some(Value::Array(refs)) => AnchorCheck {
            ok: refs.iter().all(|entry| match ProofRef::from_value(entry) {
                Some(proof) => {
                    tracing::trace!(
                        kind = %proof.kind,
                        network = %proof.network,
                        tx = %proof.tx,
                        "proof reference"
                    );
                    true
                }
                None => false,
            }),
            count: refs.len(),
        },
        Some(_) => AnchorCheck { ok: false, count: 0 },
    };
    tracing::debug!(ok = check.ok, count = check.count, "anchor check");
    check
}
