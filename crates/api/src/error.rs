use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::services::LifecycleError;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match &self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "unauthorized", msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, "forbidden", msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            ApiError::InvalidReference(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_reference",
                msg.clone(),
            ),
            ApiError::InvalidState(msg) => (StatusCode::CONFLICT, "invalid_state", msg.clone()),
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg.clone()),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                "Too many requests. Please try again later.".into(),
            ),
            ApiError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".into(),
                )
            }
        };

        let body = ErrorBody {
            error: error_code.into(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::HostUnavailable => ApiError::InvalidReference(err.to_string()),
            LifecycleError::NotFound => ApiError::NotFound(err.to_string()),
            LifecycleError::Forbidden => ApiError::Forbidden(err.to_string()),
            LifecycleError::InvalidTransition { .. } => ApiError::InvalidState(err.to_string()),
            LifecycleError::Store(inner) => ApiError::Internal(inner.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    let detail = e
                        .message
                        .clone()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "is invalid".to_string());
                    format!("{}: {}", field, detail)
                })
            })
            .collect();

        ApiError::Validation(messages.join("; "))
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".into()),
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::VisitStatus;
    use domain::services::StoreError;

    #[test]
    fn test_api_error_status_codes() {
        let cases = [
            (
                ApiError::Unauthorized("x".into()).into_response().status(),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ApiError::Forbidden("x".into()).into_response().status(),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::NotFound("x".into()).into_response().status(),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::InvalidReference("x".into())
                    .into_response()
                    .status(),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                ApiError::InvalidState("x".into()).into_response().status(),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Validation("x".into()).into_response().status(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::RateLimited.into_response().status(),
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (
                ApiError::Internal("x".into()).into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (actual, expected) in cases {
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_lifecycle_error_mapping() {
        assert!(matches!(
            ApiError::from(LifecycleError::HostUnavailable),
            ApiError::InvalidReference(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::NotFound),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::Forbidden),
            ApiError::Forbidden(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::InvalidTransition {
                current: VisitStatus::CheckedOut,
                action: "check out",
            }),
            ApiError::InvalidState(_)
        ));
        assert!(matches!(
            ApiError::from(LifecycleError::Store(StoreError::Backend("db".into()))),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_invalid_transition_message_names_current_state() {
        let err = ApiError::from(LifecycleError::InvalidTransition {
            current: VisitStatus::CheckedOut,
            action: "check out",
        });
        assert!(err.to_string().contains("checked_out"));
    }

    #[test]
    fn test_from_sqlx_row_not_found() {
        let error: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(error, ApiError::NotFound(_)));
    }
}
