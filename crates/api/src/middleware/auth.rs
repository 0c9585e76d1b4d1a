//! Authentication middleware.
//!
//! Validates the desk API key on desk routes and stores the authenticated
//! caller in request extensions for the rate limiter and handlers.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::crypto::{key_fingerprint, sha256_hex};

use crate::app::AppState;
use crate::extractors::desk_key::{DeskAuth, DESK_KEY_HEADER};

/// Middleware that requires desk API key authentication.
///
/// Validates the `X-API-Key` header against the configured digests and
/// rejects requests without a valid key.
pub async fn require_desk_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let key = match req
        .headers()
        .get(DESK_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
    {
        Some(key) => key.to_string(),
        None => return unauthorized_response("Missing API key"),
    };

    let digest = sha256_hex(&key);
    if !state.config.security.desk_api_keys.contains(&digest) {
        return unauthorized_response("Invalid API key");
    }

    req.extensions_mut().insert(DeskAuth {
        fingerprint: key_fingerprint(&key),
    });
    next.run(req).await
}

/// Helper to create unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "unauthorized",
            "message": message
        })),
    )
        .into_response()
}
