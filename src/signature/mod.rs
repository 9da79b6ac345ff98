//! Detached signature verification over the canonical receipt subset

pub mod descriptor;
pub mod primitive;
pub mod signing;

use receipt_types::{Receipt, SignatureCheck, SignatureReason};

use crate::canonical::canonicalize;
use crate::encoding::decode_flexible;

pub use descriptor::{SignatureDescriptor, SignatureOverrides, Source, Tagged, DEFAULT_ALGORITHM};
pub use primitive::{
    Ed25519Primitive, PrimitiveError, SignaturePrimitive, SigningCapability, SUPPORTED_ALGORITHM,
};
pub use signing::{
    generate_keypair, kid_for, sign_receipt, signing_key_from_seed_hex, SignatureEncoding,
    SigningError,
};

/// Verifies receipt signatures with an injected signing capability
#[derive(Debug, Clone, Default)]
pub struct SignatureVerifier {
    capability: SigningCapability,
}

impl SignatureVerifier {
    pub fn new(capability: SigningCapability) -> Self {
        Self { capability }
    }

    pub fn capability(&self) -> &SigningCapability {
        &self.capability
    }

    /// Verify the receipt's signature.
    ///
    /// Checks run in a fixed order: presence, algorithm, capability, decoding,
    /// then the cryptographic verify. The first failure decides the reason.
    pub fn verify(&self, receipt: &Receipt, overrides: &SignatureOverrides<'_>) -> SignatureCheck {
        let descriptor = SignatureDescriptor::resolve(receipt, overrides);
        let check = self.verify_descriptor(receipt, &descriptor);

        tracing::debug!(
            ok = check.ok,
            reason = check.reason.map(|r| r.as_str()),
            algorithm = descriptor.algorithm.value,
            key_source = ?descriptor.public_key.map(|k| k.source),
            signature_source = ?descriptor.signature.map(|s| s.source),
            "signature check"
        );
        check
    }

    fn verify_descriptor(
        &self,
        receipt: &Receipt,
        descriptor: &SignatureDescriptor<'_>,
    ) -> SignatureCheck {
        let (Some(public_key), Some(signature)) = (descriptor.public_key, descriptor.signature)
        else {
            return SignatureCheck::failed(SignatureReason::NotProvided);
        };

        if !descriptor.algorithm_is(SUPPORTED_ALGORITHM) {
            return SignatureCheck::failed(SignatureReason::AlgUnsupported);
        }

        let Some(primitive) = self.capability.primitive() else {
            return SignatureCheck::failed(SignatureReason::NotImplemented);
        };

        let public_key = match decode_flexible(public_key.value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(source = %public_key.source, error = %e, "undecodable public key");
                return SignatureCheck::verify_error(format!("public key: {}", e));
            }
        };
        let signature = match decode_flexible(signature.value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(source = %signature.source, error = %e, "undecodable signature");
                return SignatureCheck::verify_error(format!("signature: {}", e));
            }
        };

        let message = canonicalize(receipt);
        match primitive.verify(&public_key, &message, &signature) {
            Ok(()) => SignatureCheck::verified(),
            Err(PrimitiveError::Rejected) => SignatureCheck::failed(SignatureReason::BadSignature),
            Err(e) => SignatureCheck::verify_error(e.to_string()),
        }
    }
}

/// Verify with the built-in Ed25519 capability.
pub fn verify_signature(receipt: &Receipt, overrides: &SignatureOverrides<'_>) -> SignatureCheck {
    SignatureVerifier::default().verify(receipt, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
    use base64::Engine;
    use serde_json::{json, Value};

    const PUBLIC_KEY_HEX: &str = "8a88e3dd7409f195fd52db2d3cba5d72ca6709bf1d94121bf3748801b40f6f5c";
    const PUBLIC_KEY_B64: &str = "iojj3XQJ8ZX9UtstPLpdcspnCb8dlBIb83SIAbQPb1w=";
    const SIGNATURE_B64: &str =
        "OPAUa72HI97Dbx3BVNCVLSeUWJ1jOvgrmSCrRsYuejiUXezdsgKhM+t8nnzGqZ2tVqHT+SnBFjT1u1c6KjnKBw==";
    const SIGNATURE_HEX: &str = "38f0146bbd8723dec36f1dc154d0952d2794589d633af82b9920ab46c62e7a38945decddb202a133eb7c9e7cc6a99dad56a1d3f929c11634f5bb573a2a39ca07";

    fn unsigned() -> Value {
        json!({
            "id": "rec1",
            "issued_at": "2025-01-01T00:00:00Z",
            "input_hash": format!("sha256:{}", "a".repeat(64)),
            "output_hash": "b".repeat(64),
            "model_version": "m1",
            "policy_version": "p1"
        })
    }

    fn with_signature(signature: Value) -> Receipt {
        let mut receipt = Receipt::from_value(unsigned()).unwrap();
        receipt.insert("signature", signature);
        receipt
    }

    fn fixture() -> Receipt {
        with_signature(json!({
            "alg": "ed25519",
            "kid": format!("ed25519:{}", PUBLIC_KEY_HEX),
            "sig": SIGNATURE_B64
        }))
    }

    #[test]
    fn test_fixture_verifies() {
        let check = verify_signature(&fixture(), &SignatureOverrides::none());
        assert_eq!(check, SignatureCheck::verified());
    }

    #[test]
    fn test_field_shape_variants_verify() {
        let signature_url = URL_SAFE_NO_PAD.encode(STANDARD.decode(SIGNATURE_B64).unwrap());
        let shapes = [
            json!({"publicKey": PUBLIC_KEY_B64, "value": SIGNATURE_B64}),
            json!({"algorithm": "ED25519", "public_key": format!("0x{}", PUBLIC_KEY_HEX), "signature": SIGNATURE_HEX}),
            json!({"algo": "ed25519", "pubkey": PUBLIC_KEY_HEX, "signature_b64": signature_url}),
            json!({"key": PUBLIC_KEY_HEX, "sig": SIGNATURE_B64}),
        ];

        for shape in shapes {
            let receipt = with_signature(shape.clone());
            let check = verify_signature(&receipt, &SignatureOverrides::none());
            assert!(check.ok, "shape {} -> {:?}", shape, check);
        }
    }

    #[test]
    fn test_overrides_verify_unsigned_receipt() {
        let receipt = Receipt::from_value(unsigned()).unwrap();
        let overrides = SignatureOverrides::none()
            .public_key(PUBLIC_KEY_HEX)
            .signature(SIGNATURE_B64);
        assert!(verify_signature(&receipt, &overrides).ok);
    }

    #[test]
    fn test_tampered_subset_is_bad_signature() {
        let mut receipt = fixture();
        receipt.insert("model_version", json!("m2"));

        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert!(!check.ok);
        assert_eq!(check.reason, Some(SignatureReason::BadSignature));
    }

    #[test]
    fn test_non_subset_fields_do_not_affect_signature() {
        let mut receipt = fixture();
        receipt.insert("notes", json!({"free": "text"}));
        receipt.insert("proof_refs", json!([]));
        assert!(verify_signature(&receipt, &SignatureOverrides::none()).ok);
    }

    #[test]
    fn test_missing_signature_is_not_provided() {
        let receipt = Receipt::from_value(unsigned()).unwrap();
        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert_eq!(check, SignatureCheck::failed(SignatureReason::NotProvided));

        let key_only = with_signature(json!({"public_key": PUBLIC_KEY_HEX}));
        assert_eq!(
            verify_signature(&key_only, &SignatureOverrides::none()).reason,
            Some(SignatureReason::NotProvided)
        );

        let not_an_object = with_signature(json!(SIGNATURE_B64));
        assert_eq!(
            verify_signature(&not_an_object, &SignatureOverrides::none()).reason,
            Some(SignatureReason::NotProvided)
        );
    }

    #[test]
    fn test_unsupported_algorithm() {
        let receipt = with_signature(json!({
            "alg": "ed448",
            "public_key": PUBLIC_KEY_HEX,
            "sig": SIGNATURE_B64
        }));
        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert_eq!(check.reason, Some(SignatureReason::AlgUnsupported));

        let overridden = verify_signature(&fixture(), &SignatureOverrides::none().algorithm("rsa"));
        assert_eq!(overridden.reason, Some(SignatureReason::AlgUnsupported));
    }

    #[test]
    fn test_missing_capability_is_not_implemented() {
        let verifier = SignatureVerifier::new(SigningCapability::Unavailable);
        let check = verifier.verify(&fixture(), &SignatureOverrides::none());
        assert_eq!(check.reason, Some(SignatureReason::NotImplemented));

        // Presence and algorithm are still judged first
        let unsigned = Receipt::from_value(unsigned()).unwrap();
        assert_eq!(
            verifier.verify(&unsigned, &SignatureOverrides::none()).reason,
            Some(SignatureReason::NotProvided)
        );
    }

    #[test]
    fn test_undecodable_values_are_verify_error() {
        let receipt = with_signature(json!({"public_key": "not*hex!", "sig": SIGNATURE_B64}));
        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert_eq!(check.reason, Some(SignatureReason::VerifyError));
        assert!(check.error.as_deref().unwrap_or("").starts_with("public key"));

        let receipt = with_signature(json!({"public_key": PUBLIC_KEY_HEX, "sig": "%%%"}));
        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert_eq!(check.reason, Some(SignatureReason::VerifyError));
        assert!(check.error.as_deref().unwrap_or("").starts_with("signature"));
    }

    #[test]
    fn test_wrong_lengths_are_verify_error() {
        let short_key = with_signature(json!({"public_key": "00ff", "sig": SIGNATURE_B64}));
        let check = verify_signature(&short_key, &SignatureOverrides::none());
        assert_eq!(check.reason, Some(SignatureReason::VerifyError));
        assert!(check.error.is_some());

        let short_sig = with_signature(json!({"public_key": PUBLIC_KEY_HEX, "sig": "00ff"}));
        assert_eq!(
            verify_signature(&short_sig, &SignatureOverrides::none()).reason,
            Some(SignatureReason::VerifyError)
        );
    }

    #[test]
    fn test_wrong_key_is_bad_signature() {
        let other = kid_for(&generate_keypair().verifying_key());
        let receipt = with_signature(json!({"alg": "ed25519", "kid": other, "sig": SIGNATURE_B64}));
        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert_eq!(check, SignatureCheck::failed(SignatureReason::BadSignature));
    }

    #[test]
    fn test_small_order_key_never_verifies() {
        let identity_key = format!("01{}", "00".repeat(31));
        let null_signature = format!("01{}", "00".repeat(63));
        let forged = with_signature(json!({
            "alg": "ed25519",
            "public_key": identity_key,
            "sig": null_signature
        }));

        let check = verify_signature(&forged, &SignatureOverrides::none());
        assert_eq!(check.reason, Some(SignatureReason::VerifyError));

        let mut tampered = forged.clone();
        tampered.insert("id", json!("forged"));
        assert!(!verify_signature(&tampered, &SignatureOverrides::none()).ok);
    }

    #[test]
    fn test_kid_prefix_other_algorithm_is_unsupported() {
        let receipt = with_signature(json!({
            "alg": "ed25519",
            "kid": format!("ed448:{}", PUBLIC_KEY_HEX),
            "sig": SIGNATURE_B64
        }));
        let check = verify_signature(&receipt, &SignatureOverrides::none());
        assert_eq!(check, SignatureCheck::failed(SignatureReason::AlgUnsupported));

        // Supplying the key directly bypasses the kid label
        let overrides = SignatureOverrides::none().public_key(PUBLIC_KEY_HEX);
        assert!(verify_signature(&receipt, &overrides).ok);
    }
}
