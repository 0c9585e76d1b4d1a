//! Cryptographic utilities for desk API key hashing.
//!
//! Desk API keys are never stored or configured in the clear; the
//! configuration carries SHA-256 digests and incoming keys are hashed
//! before comparison.

use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns a short, log-safe fingerprint of a secret value.
///
/// The fingerprint is the first 8 hex characters of the SHA-256 digest,
/// enough to correlate log lines without revealing the key itself.
pub fn key_fingerprint(key: &str) -> String {
    sha256_hex(key).chars().take(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        let hash = sha256_hex("test");
        assert_eq!(hash.len(), 64);
        assert_eq!(
            hash,
            "9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08"
        );
    }

    #[test]
    fn test_sha256_hex_deterministic() {
        assert_eq!(sha256_hex("desk-key-1"), sha256_hex("desk-key-1"));
    }

    #[test]
    fn test_sha256_hex_different_inputs() {
        assert_ne!(sha256_hex("desk-key-1"), sha256_hex("desk-key-2"));
    }

    #[test]
    fn test_key_fingerprint_length() {
        assert_eq!(key_fingerprint("some-secret").len(), 8);
    }

    #[test]
    fn test_key_fingerprint_is_digest_prefix() {
        let key = "front-desk-key";
        assert!(sha256_hex(key).starts_with(&key_fingerprint(key)));
    }

    #[test]
    fn test_key_fingerprint_does_not_leak_key() {
        let key = "front-desk-key";
        assert!(!key.contains(&key_fingerprint(key)));
    }
}
