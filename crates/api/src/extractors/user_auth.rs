//! Host-portal JWT authentication extractor.
//!
//! Validates the Bearer token in the Authorization header and exposes the
//! portal user's identity. Resolution of the user to a host account is the
//! lifecycle's job, not the extractor's.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use shared::jwt::JwtConfig;
use uuid::Uuid;

use crate::app::AppState;
use crate::config::JwtAuthConfig;
use crate::error::ApiError;

/// Authenticated portal user from a validated JWT.
#[derive(Debug, Clone)]
pub struct UserAuth {
    /// User ID from the JWT subject claim.
    pub user_id: Uuid,
    /// JWT ID (jti) for session correlation in logs.
    pub jti: String,
}

/// Builds the validating JwtConfig from the app configuration.
///
/// The API only validates tokens, so the private key stays unused here.
fn jwt_config(config: &JwtAuthConfig) -> Result<JwtConfig, ApiError> {
    JwtConfig::validator(
        &config.public_key,
        config.access_token_expiry_secs,
        config.leeway_secs,
    )
    .map_err(|e| ApiError::Internal(format!("JWT configuration error: {}", e)))
}

#[async_trait]
impl FromRequestParts<AppState> for UserAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            ApiError::Unauthorized("Invalid Authorization header format".to_string())
        })?;

        let jwt = jwt_config(&state.config.jwt)?;

        let (user_id, jti) = jwt
            .validate_subject(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

        Ok(UserAuth { user_id, jti })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_auth_struct() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        };
        assert!(!auth.jti.is_empty());
    }

    #[test]
    fn test_user_auth_clone() {
        let auth = UserAuth {
            user_id: Uuid::new_v4(),
            jti: "test_jti".to_string(),
        };
        let cloned = auth.clone();
        assert_eq!(auth.user_id, cloned.user_id);
        assert_eq!(auth.jti, cloned.jti);
    }
}
