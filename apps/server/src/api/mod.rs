//! API endpoints.

pub mod auth;
pub mod class;
pub mod comment;
pub mod invitation;
pub mod project;
pub mod reply;
pub mod team;
pub mod user;
pub mod workspace;

use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
    Router,
};
use class_store::ClassStore;
use entities::Role;

use crate::error::{ServerError, ServerResult};
use crate::middleware::{auth_middleware, CurrentUser};
use crate::state::AppState;

/// Creates the API router with all endpoints.
///
/// Signup, login, invitation validation, and the health check are public;
/// everything else sits behind the bearer-token middleware.
pub fn create_router<S: ClassStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route(
            "/invitation/validate/:token",
            get(invitation::validate_invitation),
        );

    let protected = Router::new()
        // Auth endpoints
        .route("/auth/me", get(auth::me))
        // Workspace endpoints
        .route("/workspaces", post(workspace::create_workspace))
        .route("/workspaces/:id", get(workspace::get_workspace))
        .route("/workspaces/:id", put(workspace::update_workspace))
        .route("/workspaces/:id", delete(workspace::delete_workspace))
        .route("/workspaces/:id/teams", get(team::list_teams))
        // Invitation endpoints
        .route(
            "/workspace/:workspace_id/invite",
            post(invitation::create_invitation),
        )
        .route(
            "/workspace/:workspace_id/invitations",
            get(invitation::list_invitations),
        )
        .route("/invitation/use", post(invitation::use_invitation))
        // Team endpoints
        .route("/teams", post(team::create_team))
        .route("/teams/:id", get(team::get_team))
        .route("/teams/:id", delete(team::delete_team))
        .route("/teams/:id/teachers", post(team::assign_teacher))
        .route("/teams/:id/classes", post(team::add_class))
        // Class endpoints
        .route("/classes", post(class::create_class))
        .route("/classes", get(class::list_classes))
        .route("/classes/:id", get(class::get_class))
        .route("/classes/:id", put(class::update_class))
        .route("/classes/:id", delete(class::delete_class))
        // Project endpoints
        .route("/projects", post(project::create_project))
        .route("/projects/:id", get(project::get_project))
        .route("/projects/:id", put(project::update_project))
        .route("/projects/:id", delete(project::delete_project))
        .route("/projects/:id/comments", get(comment::list_comments))
        // Comment endpoints
        .route("/comments", post(comment::create_comment))
        .route("/comments/:id", put(comment::update_comment))
        .route("/comments/:id", delete(comment::delete_comment))
        .route("/comments/:id/like", post(comment::like_comment))
        // Reply endpoints
        .route("/replies", post(reply::create_reply))
        .route("/replies/:id", put(reply::update_reply))
        .route("/replies/:id", delete(reply::delete_reply))
        .route("/replies/:id/like", post(reply::like_reply))
        // User endpoints
        .route("/users/:id", get(user::get_user))
        .route("/users/:id", put(user::update_user))
        .route("/users/:id", delete(user::delete_user))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware::<S>));

    public.merge(protected).with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

/// Requires the requester to hold the teacher role.
pub(crate) fn require_teacher(user: &CurrentUser, action: &str) -> ServerResult<()> {
    if user.role == Role::Teacher {
        Ok(())
    } else {
        Err(ServerError::PermissionDenied(format!(
            "Only teachers can {action}"
        )))
    }
}
