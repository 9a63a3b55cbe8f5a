//! Authentication middleware.

use std::sync::Arc;

use api_protocol::Envelope;
use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use class_store::ClassStore;
use entities::{Role, User};
use uuid::Uuid;

use crate::state::AppState;

/// The authenticated requester, resolved from the bearer token and stored in
/// request extensions for the duration of the request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account role.
    pub role: Role,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Extracts the bearer token from the Authorization header.
///
/// Accepts both `Bearer <token>` and a raw token value.
fn extract_token(request: &Request) -> Option<String> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| auth::parse_bearer(value).to_string())
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(Envelope::<()>::error(message)),
    )
        .into_response()
}

/// Authentication middleware.
///
/// Resolves the bearer token in the Authorization header to the user whose
/// stored access token matches, and inserts a [`CurrentUser`] into the
/// request extensions.
pub async fn auth_middleware<S: ClassStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) if !token.is_empty() => token,
        _ => return unauthorized("Missing authorization header"),
    };

    match state.store.get_user_by_access_token(&token).await {
        Ok(Some(user)) => {
            request.extensions_mut().insert(CurrentUser::from(&user));
        }
        Ok(None) => return unauthorized("Invalid access token"),
        Err(err) => {
            tracing::error!(error = %err, "Access token lookup failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(Envelope::<()>::error("Internal server error")),
            )
                .into_response();
        }
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: &str) -> Request {
        axum::http::Request::builder()
            .header(AUTHORIZATION, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_token_with_bearer_scheme() {
        let request = request_with_auth("Bearer test-token-123");
        assert_eq!(extract_token(&request), Some("test-token-123".to_string()));
    }

    #[test]
    fn test_extract_token_raw_value() {
        let request = request_with_auth("test-token-123");
        assert_eq!(extract_token(&request), Some("test-token-123".to_string()));
    }

    #[test]
    fn test_extract_token_missing_header() {
        let request = axum::http::Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_token(&request), None);
    }

    #[test]
    fn test_current_user_from_entity() {
        let user = User::new("alice", "alice@example.com", "hash", Role::Teacher, "tok");
        let current = CurrentUser::from(&user);

        assert_eq!(current.id, user.id);
        assert_eq!(current.name, "alice");
        assert_eq!(current.role, Role::Teacher);
    }
}
