//! Webhook shared-secret check
//!
//! The configured secret is never compared byte-by-byte against caller input.
//! Both sides are fed as the message of an HMAC under a fixed key and the tags
//! are compared with `Mac::verify_slice`, which runs in constant time. The
//! secret must never be the HMAC key: keys are zero-padded or pre-hashed, so
//! distinct secrets would collide.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const TAG_KEY: &[u8] = b"tradeview-bridge/webhook-secret";

/// Verifies the `secret` field of inbound alerts
#[derive(Clone)]
pub struct SecretVerifier {
    expected_tag: Vec<u8>,
}

impl SecretVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            expected_tag: Self::mac(secret).finalize().into_bytes().to_vec(),
        }
    }

    fn mac(secret: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(TAG_KEY).expect("HMAC can take key of any size");
        mac.update(secret.as_bytes());
        mac
    }

    /// True when `provided` equals the configured secret
    pub fn verify(&self, provided: &str) -> bool {
        Self::mac(provided).verify_slice(&self.expected_tag).is_ok()
    }
}

impl std::fmt::Debug for SecretVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretVerifier(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_secret() {
        let verifier = SecretVerifier::new("tv-secret");
        assert!(verifier.verify("tv-secret"));
    }

    #[test]
    fn test_mismatched_secret() {
        let verifier = SecretVerifier::new("tv-secret");
        assert!(!verifier.verify("tv-Secret"));
        assert!(!verifier.verify("tv-secret "));
        assert!(!verifier.verify(""));
        assert!(!verifier.verify("tv-secre"));
    }

    #[test]
    fn test_trailing_nul_bytes_rejected() {
        let verifier = SecretVerifier::new("S");
        assert!(!verifier.verify("S\u{0}"));
        assert!(!verifier.verify("S\u{0}\u{0}"));
    }

    #[test]
    fn test_long_secret_exact_match_only() {
        use sha2::Digest;

        let secret = "x".repeat(100);
        let verifier = SecretVerifier::new(&secret);
        assert!(verifier.verify(&secret));
        assert!(!verifier.verify(&"x".repeat(99)));

        // A key longer than the block size is replaced by its digest inside HMAC;
        // that digest must not stand in for the secret.
        let digest = sha2::Sha256::digest(secret.as_bytes());
        let digest_str: String = digest.iter().map(|&b| b as char).collect();
        assert!(!verifier.verify(&digest_str));
    }

    #[test]
    fn test_debug_hides_tag() {
        let verifier = SecretVerifier::new("S");
        assert_eq!(format!("{:?}", verifier), "SecretVerifier(<redacted>)");
    }
}
