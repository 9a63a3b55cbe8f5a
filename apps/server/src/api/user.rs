//! User API endpoints.

use std::sync::Arc;

use api_protocol::{Envelope, UpdateUserRequest, UserSummary};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use class_store::ClassStore;
use entities::{deleted_user_id, Role, User, DELETED_USER_NAME};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Converts an entity role to its wire form.
pub(crate) fn to_api_role(role: Role) -> api_protocol::Role {
    match role {
        Role::Teacher => api_protocol::Role::Teacher,
        Role::Student => api_protocol::Role::Student,
    }
}

/// Converts a wire role to its entity form.
pub(crate) fn to_entity_role(role: api_protocol::Role) -> Role {
    match role {
        api_protocol::Role::Teacher => Role::Teacher,
        api_protocol::Role::Student => Role::Student,
    }
}

/// Converts an entity User to the wire User. Credentials and the access
/// token are not part of the wire type.
pub(crate) fn entity_to_api_user(user: &User) -> api_protocol::User {
    api_protocol::User {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
        role: to_api_role(user.role),
        profile_image: user.profile_image.clone(),
        teams: user.teams.iter().map(|id| id.to_string()).collect(),
        workspaces: user.workspaces.iter().map(|id| id.to_string()).collect(),
        liked_comments: user.liked_comments.iter().map(|id| id.to_string()).collect(),
        liked_replies: user.liked_replies.iter().map(|id| id.to_string()).collect(),
        created_at: user.created_at,
    }
}

/// Converts an entity User to an identity summary.
pub(crate) fn user_summary(user: &User) -> UserSummary {
    UserSummary {
        id: user.id.to_string(),
        name: user.name.clone(),
        email: user.email.clone(),
    }
}

/// The placeholder served for content whose author has been deleted.
fn deleted_user_placeholder() -> api_protocol::User {
    api_protocol::User {
        id: deleted_user_id().to_string(),
        name: DELETED_USER_NAME.to_string(),
        email: String::new(),
        role: api_protocol::Role::Student,
        profile_image: None,
        teams: Vec::new(),
        workspaces: Vec::new(),
        liked_comments: Vec::new(),
        liked_replies: Vec::new(),
        created_at: chrono::Utc::now(),
    }
}

/// Gets a user by ID. The sentinel deleted-user identity resolves to a
/// placeholder rather than a stored record.
pub async fn get_user<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Envelope<api_protocol::User>>> {
    let user_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid user id".to_string()))?;

    if user_id == deleted_user_id() {
        return Ok(Json(Envelope::ok(deleted_user_placeholder(), "User found")));
    }

    let user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    Ok(Json(Envelope::ok(entity_to_api_user(&user), "User found")))
}

/// Updates a user's own profile.
pub async fn update_user<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateUserRequest>,
) -> ServerResult<Json<Envelope<api_protocol::User>>> {
    let user_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid user id".to_string()))?;

    if current.id != user_id {
        return Err(ServerError::PermissionDenied(
            "You can only update your own profile".to_string(),
        ));
    }

    let mut user = state
        .store
        .get_user(user_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServerError::InvalidRequest(
                "Name must not be empty".to_string(),
            ));
        }
        if name != user.name
            && state.store.get_user_by_name(&name).await?.is_some()
        {
            return Err(ServerError::Conflict("Name already in use".to_string()));
        }
        user.name = name;
    }
    if let Some(profile_image) = request.profile_image {
        user.profile_image = Some(profile_image);
    }
    user.updated_at = chrono::Utc::now();

    let user = state.store.update_user(user).await?;

    tracing::info!(user_id = %user_id, "User updated");

    Ok(Json(Envelope::ok(entity_to_api_user(&user), "User updated")))
}

/// Deletes a user. Their comments and replies are reassigned to the
/// deleted-user placeholder in the same operation.
pub async fn delete_user<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    let user_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid user id".to_string()))?;

    if current.id != user_id && current.role != Role::Teacher {
        return Err(ServerError::PermissionDenied(
            "You can only delete your own account".to_string(),
        ));
    }

    state.store.delete_user(user_id).await?;

    tracing::info!(user_id = %user_id, "User deleted");

    Ok(Json(Envelope::ok((), "User deleted")))
}
