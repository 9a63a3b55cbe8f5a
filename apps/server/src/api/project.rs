//! Project API endpoints.

use std::sync::Arc;

use api_protocol::{CreateProjectRequest, Envelope, UpdateProjectRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use class_store::ClassStore;
use entities::Project;
use uuid::Uuid;

use crate::api::require_teacher;
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Converts an entity Project to the wire Project.
pub(crate) fn entity_to_api_project(project: &Project) -> api_protocol::Project {
    api_protocol::Project {
        id: project.id.to_string(),
        name: project.name.clone(),
        description: project.description.clone(),
        video_url: project.video_url.clone(),
        thumbnail_url: project.thumbnail_url.clone(),
        class_id: project.class_id.to_string(),
        comments: project.comments.iter().map(|id| id.to_string()).collect(),
        created_at: project.created_at,
        updated_at: project.updated_at,
    }
}

/// Creates a project and links it into its class.
pub async fn create_project<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateProjectRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<api_protocol::Project>>)> {
    require_teacher(&current, "create projects")?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServerError::InvalidRequest(
            "Project name is required".to_string(),
        ));
    }

    let class_id: Uuid = request
        .class_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid class id".to_string()))?;

    let mut class = state
        .store
        .get_class(class_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Class not found".to_string()))?;

    let mut project = Project::new(name, class_id);
    if let Some(description) = request.description {
        project = project.with_description(description);
    }
    if let Some(video_url) = request.video_url {
        project = project.with_video_url(video_url);
    }
    if let Some(thumbnail_url) = request.thumbnail_url {
        project = project.with_thumbnail_url(thumbnail_url);
    }

    let project = state.store.create_project(project).await?;

    class.projects.push(project.id);
    class.updated_at = chrono::Utc::now();
    state.store.update_class(class).await?;

    tracing::info!(project_id = %project.id, class_id = %class_id, "Project created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            entity_to_api_project(&project),
            "Project created",
        )),
    ))
}

/// Gets a project by ID.
pub async fn get_project<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Envelope<api_protocol::Project>>> {
    let project_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid project id".to_string()))?;

    let project = state
        .store
        .get_project(project_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Project not found".to_string()))?;

    Ok(Json(Envelope::ok(
        entity_to_api_project(&project),
        "Project found",
    )))
}

/// Updates a project.
pub async fn update_project<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateProjectRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Project>>> {
    require_teacher(&current, "update projects")?;

    let project_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid project id".to_string()))?;

    let mut project = state
        .store
        .get_project(project_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Project not found".to_string()))?;

    if let Some(name) = request.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ServerError::InvalidRequest(
                "Project name must not be empty".to_string(),
            ));
        }
        project.name = name;
    }
    if let Some(description) = request.description {
        project.description = Some(description);
    }
    if let Some(video_url) = request.video_url {
        project.video_url = Some(video_url);
    }
    if let Some(thumbnail_url) = request.thumbnail_url {
        project.thumbnail_url = Some(thumbnail_url);
    }
    project.updated_at = chrono::Utc::now();

    let project = state.store.update_project(project).await?;

    tracing::info!(project_id = %project_id, "Project updated");

    Ok(Json(Envelope::ok(
        entity_to_api_project(&project),
        "Project updated",
    )))
}

/// Deletes a project, cascading to its comments and replies.
pub async fn delete_project<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    require_teacher(&current, "delete projects")?;

    let project_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid project id".to_string()))?;

    state.store.delete_project(project_id).await?;

    tracing::info!(project_id = %project_id, "Project deleted");

    Ok(Json(Envelope::ok((), "Project and its feedback deleted")))
}
