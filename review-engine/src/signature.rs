//! Webhook signature verification.
//!
//! Two schemes cover the supported providers:
//! - GitHub signs the raw request body with HMAC-SHA256 and sends
//!   `X-Hub-Signature-256: sha256=<hex>`.
//! - GitLab and Gitee send the configured secret back verbatim in a token
//!   header.
//!
//! Both checks go through [`constant_time_eq`], which XOR-accumulates over
//! the full string instead of returning at the first differing byte.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 of `payload` keyed by `secret`.
pub fn hmac_sha256_hex(secret: &[u8], payload: &[u8]) -> String {
    // HMAC accepts keys of any length; new_from_slice cannot fail for SHA-256.
    let mut mac = HmacSha256::new_from_slice(secret).expect("hmac accepts any key length");
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a `sha256=<hex>`-style HMAC signature header over the raw body.
///
/// Returns false on a missing/blank input, a header without the `sha256=`
/// prefix, or a digest mismatch. The digest comparison is constant-time.
pub fn verify_hmac_signature(payload: &[u8], header_value: &str, secret: &str) -> bool {
    if secret.is_empty() {
        return false;
    }
    let Some(signature) = header_value.strip_prefix("sha256=") else {
        return false;
    };

    let expected = hmac_sha256_hex(secret.as_bytes(), payload);
    constant_time_eq(signature, &expected)
}

/// Verifies a shared-token header against the configured secret.
///
/// Returns false when either side is empty.
pub fn verify_shared_token(header_token: &str, secret: &str) -> bool {
    if header_token.is_empty() || secret.is_empty() {
        return false;
    }
    constant_time_eq(header_token, secret)
}

/// Constant-time string equality.
///
/// Unequal lengths fail immediately without touching the contents; for
/// equal lengths every byte pair is XORed into an accumulator so the
/// decision never depends on where the first difference sits.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let a = a.as_bytes();
    let b = b.as_bytes();
    if a.len() != b.len() {
        return false;
    }

    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_strings_compare_equal() {
        assert!(constant_time_eq("", ""));
        assert!(constant_time_eq("secret-token", "secret-token"));
    }

    #[test]
    fn any_single_byte_difference_fails() {
        let base = "0123456789abcdef";
        for i in 0..base.len() {
            let mut corrupted = base.as_bytes().to_vec();
            corrupted[i] ^= 0x01;
            let corrupted = String::from_utf8(corrupted).unwrap();
            assert!(!constant_time_eq(base, &corrupted), "index {i}");
        }
    }

    #[test]
    fn unequal_lengths_fail() {
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(!constant_time_eq("abcd", "abc"));
        assert!(!constant_time_eq("", "a"));
    }

    #[test]
    fn hmac_signature_round_trip() {
        let payload = br#"{"action":"opened"}"#;
        let secret = "wh-secret";
        let header = format!("sha256={}", hmac_sha256_hex(secret.as_bytes(), payload));

        assert!(verify_hmac_signature(payload, &header, secret));
        assert!(!verify_hmac_signature(payload, &header, "other-secret"));
    }

    #[test]
    fn header_without_prefix_is_rejected() {
        let payload = b"body";
        let digest = hmac_sha256_hex(b"s", payload);

        assert!(!verify_hmac_signature(payload, &digest, "s"));
        assert!(!verify_hmac_signature(payload, &format!("sha1={digest}"), "s"));
        assert!(!verify_hmac_signature(payload, "", "s"));
    }

    #[test]
    fn corruption_position_does_not_change_the_decision() {
        let payload = b"the quick brown fox jumps over the lazy dog";
        let secret = "s3cr3t";
        let header = format!("sha256={}", hmac_sha256_hex(secret.as_bytes(), payload));

        for i in 0..payload.len() {
            let mut corrupted = payload.to_vec();
            corrupted[i] ^= 0x40;
            assert!(!verify_hmac_signature(&corrupted, &header, secret), "index {i}");
        }
    }

    #[test]
    fn shared_token_requires_both_sides() {
        assert!(verify_shared_token("tok", "tok"));
        assert!(!verify_shared_token("tok", "other"));
        assert!(!verify_shared_token("", "tok"));
        assert!(!verify_shared_token("tok", ""));
    }
}
