//! Webhook signature computation and verification.
//!
//! Signatures are HMAC-SHA256 over the canonical JSON serialization of the
//! payload, base64-encoded. Canonical here means serde_json's own
//! serialization of the parsed value: object keys come out in a fixed order,
//! so producer and verifier agree on the exact bytes regardless of how the
//! sender formatted the document.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the base64 HMAC-SHA256 signature for a payload. `None` only if
/// the payload cannot be serialized.
pub fn compute_signature(payload: &Value, secret: &str) -> Option<String> {
    let canonical = serde_json::to_string(payload).ok()?;
    let mut mac = <HmacSha256 as Mac>::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(canonical.as_bytes());
    Some(BASE64.encode(mac.finalize().into_bytes()))
}

/// Verifies a webhook signature in constant time.
///
/// Returns `false` on mismatch and on any internal failure; verification
/// never aborts request processing with an error.
pub fn verify_signature(payload: &Value, signature: &str, secret: &str) -> bool {
    match compute_signature(payload, secret) {
        Some(expected) => constant_time_eq(signature.as_bytes(), expected.as_bytes()),
        None => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_signature_roundtrip() {
        let payload = json!({"accountId": "0015g00000AbCdE", "eventType": "account_updated"});
        let signature = compute_signature(&payload, "shared-secret").unwrap();
        assert!(verify_signature(&payload, &signature, "shared-secret"));
    }

    #[test]
    fn test_wrong_signature_rejected() {
        let payload = json!({"accountId": "0015g00000AbCdE"});
        assert!(!verify_signature(&payload, "bm90LXRoZS1zaWduYXR1cmU=", "shared-secret"));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let payload = json!({"accountId": "0015g00000AbCdE"});
        let signature = compute_signature(&payload, "shared-secret").unwrap();
        assert!(!verify_signature(&payload, &signature, "other-secret"));
    }

    #[test]
    fn test_key_order_does_not_change_signature() {
        let a: Value = serde_json::from_str(r#"{"b": 1, "a": {"y": 2, "x": 3}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"a": {"x": 3, "y": 2}, "b": 1}"#).unwrap();
        let secret = "shared-secret";
        assert_eq!(
            compute_signature(&a, secret).unwrap(),
            compute_signature(&b, secret).unwrap()
        );
    }

    #[test]
    fn test_signature_is_base64_of_sha256_digest() {
        let payload = json!({"accountId": "x"});
        let signature = compute_signature(&payload, "s").unwrap();
        let decoded = BASE64.decode(signature).unwrap();
        assert_eq!(decoded.len(), 32);
    }

    #[test]
    fn test_empty_secret_still_verifies() {
        let payload = json!({"accountId": "x"});
        let signature = compute_signature(&payload, "").unwrap();
        assert!(verify_signature(&payload, &signature, ""));
    }
}
