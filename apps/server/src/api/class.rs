//! Class API endpoints.

use std::sync::Arc;

use api_protocol::{CreateClassRequest, Envelope, ListClassesResponse, UpdateClassRequest};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use class_store::ClassStore;
use entities::Class;
use uuid::Uuid;

use crate::api::require_teacher;
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Converts an entity Class to the wire Class.
pub(crate) fn entity_to_api_class(class: &Class) -> api_protocol::Class {
    api_protocol::Class {
        id: class.id.to_string(),
        title: class.title.clone(),
        projects: class.projects.iter().map(|id| id.to_string()).collect(),
        created_at: class.created_at,
        updated_at: class.updated_at,
    }
}

/// Creates a class.
pub async fn create_class<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateClassRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<api_protocol::Class>>)> {
    require_teacher(&current, "create classes")?;

    let title = request.title.trim();
    if title.is_empty() {
        return Err(ServerError::InvalidRequest(
            "Class title is required".to_string(),
        ));
    }

    let class = state.store.create_class(Class::new(title)).await?;

    tracing::info!(class_id = %class.id, "Class created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(entity_to_api_class(&class), "Class created")),
    ))
}

/// Lists all classes, newest first.
pub async fn list_classes<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<Envelope<ListClassesResponse>>> {
    let classes = state.store.list_classes().await?;

    Ok(Json(Envelope::ok(
        ListClassesResponse {
            classes: classes.iter().map(entity_to_api_class).collect(),
        },
        "Classes found",
    )))
}

/// Gets a class by ID.
pub async fn get_class<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Envelope<api_protocol::Class>>> {
    let class_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid class id".to_string()))?;

    let class = state
        .store
        .get_class(class_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Class not found".to_string()))?;

    Ok(Json(Envelope::ok(entity_to_api_class(&class), "Class found")))
}

/// Updates a class.
pub async fn update_class<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UpdateClassRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Class>>> {
    require_teacher(&current, "update classes")?;

    let class_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid class id".to_string()))?;

    let mut class = state
        .store
        .get_class(class_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Class not found".to_string()))?;

    if let Some(title) = request.title {
        let title = title.trim().to_string();
        if title.is_empty() {
            return Err(ServerError::InvalidRequest(
                "Class title must not be empty".to_string(),
            ));
        }
        class.title = title;
    }
    class.updated_at = chrono::Utc::now();

    let class = state.store.update_class(class).await?;

    tracing::info!(class_id = %class_id, "Class updated");

    Ok(Json(Envelope::ok(entity_to_api_class(&class), "Class updated")))
}

/// Deletes a class, cascading to its projects, comments, and replies.
pub async fn delete_class<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    require_teacher(&current, "delete classes")?;

    let class_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid class id".to_string()))?;

    state.store.delete_class(class_id).await?;

    tracing::info!(class_id = %class_id, "Class deleted");

    Ok(Json(Envelope::ok((), "Class and its projects deleted")))
}
