//! Gate pass encoding for checkpoint scanners.
//!
//! A gate pass is the displayable verification artifact bound to a visit:
//! a URL-safe base64 bundle of JSON carrying the session token plus the
//! minimal visitor fields a checkpoint screen shows. Scanners may also hand
//! back a bare token or a URL containing the token, so token extraction
//! accepts all three shapes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::token::looks_like_session_token;

/// Error type for gate pass operations.
#[derive(Debug, Error)]
pub enum PassError {
    #[error("Invalid pass encoding")]
    InvalidEncoding,
    #[error("Invalid pass payload")]
    InvalidPayload,
    #[error("Pass does not carry a session token")]
    MissingToken,
}

/// Decoded gate pass contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GatePass {
    pub token: String,
    pub visitor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor_company: Option<String>,
    pub purpose: String,
}

/// Encodes a gate pass into its scannable string form.
pub fn encode_pass(pass: &GatePass) -> String {
    // serialization of a plain struct cannot fail
    let json = serde_json::to_vec(pass).expect("gate pass serialization");
    URL_SAFE_NO_PAD.encode(json)
}

/// Decodes a scanned bundle back into a gate pass.
pub fn decode_pass(encoded: &str) -> Result<GatePass, PassError> {
    let raw = URL_SAFE_NO_PAD
        .decode(encoded.trim())
        .map_err(|_| PassError::InvalidEncoding)?;

    let pass: GatePass =
        serde_json::from_slice(&raw).map_err(|_| PassError::InvalidPayload)?;

    if !looks_like_session_token(&pass.token) {
        return Err(PassError::MissingToken);
    }

    Ok(pass)
}

/// Extracts a session token from whatever a checkpoint scanner read.
///
/// Accepted shapes:
/// - an encoded gate pass bundle,
/// - a bare session token,
/// - a URL carrying the token as a path segment or query parameter.
pub fn extract_token(input: &str) -> Option<String> {
    let input = input.trim();

    if looks_like_session_token(input) {
        return Some(input.to_string());
    }

    if let Ok(pass) = decode_pass(input) {
        return Some(pass.token);
    }

    // URL shape: scan path segments and query key/value parts for a token.
    input
        .split(['/', '?', '&', '=', '#'])
        .find(|part| looks_like_session_token(part))
        .map(|part| part.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::generate_session_token;

    fn sample_pass() -> GatePass {
        GatePass {
            token: generate_session_token(),
            visitor_name: "Amira Haddad".to_string(),
            visitor_company: Some("Acme Logistics".to_string()),
            purpose: "Quarterly review".to_string(),
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        let pass = sample_pass();
        let encoded = encode_pass(&pass);
        let decoded = decode_pass(&encoded).unwrap();
        assert_eq!(decoded, pass);
    }

    #[test]
    fn test_encoded_pass_is_url_safe() {
        let encoded = encode_pass(&sample_pass());
        assert!(encoded
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_pass("%%% not base64 %%%"),
            Err(PassError::InvalidEncoding)
        ));
    }

    #[test]
    fn test_decode_rejects_wrong_payload() {
        let encoded = URL_SAFE_NO_PAD.encode(b"{\"some\":\"json\"}");
        assert!(matches!(
            decode_pass(&encoded),
            Err(PassError::InvalidPayload)
        ));
    }

    #[test]
    fn test_decode_rejects_missing_token() {
        let encoded = URL_SAFE_NO_PAD.encode(
            b"{\"token\":\"nope\",\"visitor_name\":\"A\",\"purpose\":\"B\"}",
        );
        assert!(matches!(decode_pass(&encoded), Err(PassError::MissingToken)));
    }

    #[test]
    fn test_extract_token_from_bare_token() {
        let token = generate_session_token();
        assert_eq!(extract_token(&token), Some(token.clone()));
        assert_eq!(extract_token(&format!("  {}  ", token)), Some(token));
    }

    #[test]
    fn test_extract_token_from_bundle() {
        let pass = sample_pass();
        let encoded = encode_pass(&pass);
        assert_eq!(extract_token(&encoded), Some(pass.token));
    }

    #[test]
    fn test_extract_token_from_url_path_segment() {
        let token = generate_session_token();
        let url = format!("https://vm.example.com/checkpoint/{}", token);
        assert_eq!(extract_token(&url), Some(token));
    }

    #[test]
    fn test_extract_token_from_url_query_parameter() {
        let token = generate_session_token();
        let url = format!("https://vm.example.com/scan?pass={}&kiosk=3", token);
        assert_eq!(extract_token(&url), Some(token));
    }

    #[test]
    fn test_extract_token_none_for_unrelated_input() {
        assert_eq!(extract_token("https://vm.example.com/scan?pass=abc"), None);
        assert_eq!(extract_token("hello world"), None);
        assert_eq!(extract_token(""), None);
    }
}
