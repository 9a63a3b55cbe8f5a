//! Authentication API endpoints.

use std::sync::Arc;

use api_protocol::{AuthResponse, Envelope, LoginRequest, SignupRequest};
use axum::{extract::State, http::StatusCode, Extension, Json};
use class_store::ClassStore;
use entities::User;

use crate::api::user::{entity_to_api_user, to_entity_role};
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Creates an account and returns its bearer token.
pub async fn signup<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<SignupRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<AuthResponse>>)> {
    let name = request.name.trim();
    let email = request.email.trim();
    if name.is_empty() || email.is_empty() || request.password.is_empty() {
        return Err(ServerError::InvalidRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    if state.store.get_user_by_email(email).await?.is_some() {
        return Err(ServerError::Conflict("Email already in use".to_string()));
    }
    if state.store.get_user_by_name(name).await?.is_some() {
        return Err(ServerError::Conflict("Name already in use".to_string()));
    }

    let password_hash = auth::hash_password(&request.password);
    let access_token = auth::generate_token();

    let user = state
        .store
        .create_user(User::new(
            name,
            email,
            password_hash,
            to_entity_role(request.role),
            access_token.clone(),
        ))
        .await?;

    tracing::info!(user_id = %user.id, role = %user.role, "User signed up");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            AuthResponse {
                access_token,
                user: entity_to_api_user(&user),
            },
            "Account created",
        )),
    ))
}

/// Authenticates by email and password, rotating the stored access token.
pub async fn login<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<LoginRequest>,
) -> ServerResult<Json<Envelope<AuthResponse>>> {
    // Unknown email and wrong password answer identically.
    let invalid = || ServerError::Unauthorized("Invalid email or password".to_string());

    let mut user = state
        .store
        .get_user_by_email(request.email.trim())
        .await?
        .ok_or_else(invalid)?;

    let verified = auth::verify_password(&request.password, &user.password_hash)
        .map_err(|e| ServerError::Internal(format!("Credential verification failed: {e}")))?;
    if !verified {
        return Err(invalid());
    }

    let access_token = auth::generate_token();
    user.access_token = access_token.clone();
    user.updated_at = chrono::Utc::now();
    let user = state.store.update_user(user).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(Envelope::ok(
        AuthResponse {
            access_token,
            user: entity_to_api_user(&user),
        },
        "Logged in",
    )))
}

/// Gets the current authenticated user.
pub async fn me<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<api_protocol::User>>> {
    let user = state
        .store
        .get_user(current.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::ok(entity_to_api_user(&user), "User found")))
}
