//! Workspace API endpoints.

use std::sync::Arc;

use api_protocol::{CreateWorkspaceRequest, Envelope, UpdateWorkspaceRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use class_store::ClassStore;
use entities::Workspace;
use uuid::Uuid;

use crate::api::require_teacher;
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Converts an entity Workspace to the wire Workspace.
pub(crate) fn entity_to_api_workspace(workspace: &Workspace) -> api_protocol::Workspace {
    api_protocol::Workspace {
        id: workspace.id.to_string(),
        name: workspace.name.clone(),
        creator_id: workspace.creator_id.to_string(),
        teams: workspace.teams.iter().map(|id| id.to_string()).collect(),
        classes: workspace.classes.iter().map(|id| id.to_string()).collect(),
        created_at: workspace.created_at,
        updated_at: workspace.updated_at,
    }
}

/// Creates a workspace. The creator becomes a member.
pub async fn create_workspace<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateWorkspaceRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<api_protocol::Workspace>>)> {
    require_teacher(&current, "create workspaces")?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServerError::InvalidRequest(
            "Workspace name is required".to_string(),
        ));
    }

    let workspace = state
        .store
        .create_workspace(Workspace::new(name, current.id))
        .await?;

    if let Some(mut creator) = state.store.get_user(current.id).await? {
        creator.join_workspace(workspace.id);
        creator.updated_at = chrono::Utc::now();
        state.store.update_user(creator).await?;
    }

    tracing::info!(workspace_id = %workspace.id, "Workspace created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            entity_to_api_workspace(&workspace),
            "Workspace created",
        )),
    ))
}

/// Gets a workspace by ID.
pub async fn get_workspace<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Envelope<api_protocol::Workspace>>> {
    let workspace_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    let workspace = state
        .store
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Workspace not found".to_string()))?;

    Ok(Json(Envelope::ok(
        entity_to_api_workspace(&workspace),
        "Workspace found",
    )))
}

/// Updates a workspace.
pub async fn update_workspace<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateWorkspaceRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Workspace>>> {
    require_teacher(&current, "update workspaces")?;

    let workspace_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    let mut workspace = state
        .store
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Workspace not found".to_string()))?;

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServerError::InvalidRequest(
                "Workspace name must not be empty".to_string(),
            ));
        }
        workspace.name = name;
    }
    workspace.updated_at = chrono::Utc::now();

    let workspace = state.store.update_workspace(workspace).await?;

    tracing::info!(workspace_id = %workspace_id, "Workspace updated");

    Ok(Json(Envelope::ok(
        entity_to_api_workspace(&workspace),
        "Workspace updated",
    )))
}

/// Deletes a workspace. Classes and teams it references are left in place.
pub async fn delete_workspace<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    require_teacher(&current, "delete workspaces")?;

    let workspace_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    state.store.delete_workspace(workspace_id).await?;

    tracing::info!(workspace_id = %workspace_id, "Workspace deleted");

    Ok(Json(Envelope::ok((), "Workspace deleted")))
}
