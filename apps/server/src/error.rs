//! Server error types.

use api_protocol::Envelope;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Authentication missing or invalid.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Authenticated but lacking the required role or ownership.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Uniqueness violation.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store error.
    #[error("Store error: {0}")]
    Store(#[from] class_store::ClassStoreError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ServerError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ServerError::PermissionDenied(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ServerError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ServerError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ServerError::Store(class_store::ClassStoreError::NotFound { entity_type, .. }) => {
                (StatusCode::NOT_FOUND, format!("{entity_type} not found"))
            }
            ServerError::Store(class_store::ClassStoreError::AlreadyExists {
                entity_type, ..
            }) => (StatusCode::CONFLICT, format!("{entity_type} already exists")),
            // Internals are logged server-side and never surfaced to clients.
            ServerError::Store(e) => {
                tracing::error!(error = %e, "Store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(Envelope::<()>::error(message))).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (
                ServerError::InvalidRequest("bad".into()),
                StatusCode::BAD_REQUEST,
            ),
            (
                ServerError::Unauthorized("no token".into()),
                StatusCode::UNAUTHORIZED,
            ),
            (
                ServerError::PermissionDenied("nope".into()),
                StatusCode::FORBIDDEN,
            ),
            (
                ServerError::NotFound("gone".into()),
                StatusCode::NOT_FOUND,
            ),
            (
                ServerError::Conflict("taken".into()),
                StatusCode::CONFLICT,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let error: ServerError = class_store::ClassStoreError::not_found("Class", "x").into();
        assert_eq!(error.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_internal_error_is_sanitized() {
        let response =
            ServerError::Internal("connection pool exhausted at 10.0.0.3".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
