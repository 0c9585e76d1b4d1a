//! Session token generation for visits.
//!
//! Every visit is bound to a globally unique opaque token presented at
//! checkpoints. Tokens carry enough entropy that collision is statistically
//! negligible; the authoritative uniqueness guarantee is the UNIQUE
//! constraint on the visits table, which the lifecycle retries against.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand::Rng;

/// Session token prefix.
pub const TOKEN_PREFIX: &str = "vst_";

/// Length of random bytes backing a session token.
const TOKEN_RANDOM_BYTES: usize = 24;

/// Generate a new session token.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..TOKEN_RANDOM_BYTES).map(|_| rng.gen()).collect();
    format!("{}{}", TOKEN_PREFIX, URL_SAFE_NO_PAD.encode(&random_bytes))
}

/// Short token prefix for log correlation (never log the full token).
pub fn token_prefix(token: &str) -> String {
    token.chars().take(10).collect()
}

/// Whether a string is plausibly a session token.
///
/// Used by gate pass parsing to tell a bare token apart from an encoded
/// bundle or URL; a `true` result does not imply the token exists.
pub fn looks_like_session_token(s: &str) -> bool {
    s.starts_with(TOKEN_PREFIX)
        && s.len() > TOKEN_PREFIX.len() + 16
        && s[TOKEN_PREFIX.len()..]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
