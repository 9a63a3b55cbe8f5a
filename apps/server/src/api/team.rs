//! Team API endpoints.

use std::sync::Arc;

use api_protocol::{
    AddTeamClassRequest, AssignTeacherRequest, CreateTeamRequest, Envelope, ListTeamsResponse,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use class_store::ClassStore;
use entities::{Role, Team};
use uuid::Uuid;

use crate::api::require_teacher;
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::state::AppState;

/// Converts an entity Team to the wire Team.
pub(crate) fn entity_to_api_team(team: &Team) -> api_protocol::Team {
    api_protocol::Team {
        id: team.id.to_string(),
        name: team.name.clone(),
        creator_id: team.creator_id.to_string(),
        workspace_id: team.workspace_id.to_string(),
        teachers: team.teachers.iter().map(|id| id.to_string()).collect(),
        classes: team.classes.iter().map(|id| id.to_string()).collect(),
        created_at: team.created_at,
        updated_at: team.updated_at,
    }
}

/// Creates a team inside a workspace. The creator is assigned as its first
/// teacher.
pub async fn create_team<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<CreateTeamRequest>,
) -> ServerResult<(StatusCode, Json<Envelope<api_protocol::Team>>)> {
    require_teacher(&current, "create teams")?;

    let name = request.name.trim();
    if name.is_empty() {
        return Err(ServerError::InvalidRequest(
            "Team name is required".to_string(),
        ));
    }

    let workspace_id: Uuid = request
        .workspace_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    let mut workspace = state
        .store
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Workspace not found".to_string()))?;

    let mut team = Team::new(name, current.id, workspace_id);
    team.assign_teacher(current.id);
    let team = state.store.create_team(team).await?;

    workspace.teams.push(team.id);
    workspace.updated_at = chrono::Utc::now();
    state.store.update_workspace(workspace).await?;

    if let Some(mut creator) = state.store.get_user(current.id).await? {
        if !creator.teams.contains(&team.id) {
            creator.teams.push(team.id);
            creator.updated_at = chrono::Utc::now();
            state.store.update_user(creator).await?;
        }
    }

    tracing::info!(team_id = %team.id, workspace_id = %workspace_id, "Team created");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(entity_to_api_team(&team), "Team created")),
    ))
}

/// Gets a team by ID.
pub async fn get_team<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> ServerResult<Json<Envelope<api_protocol::Team>>> {
    let team_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid team id".to_string()))?;

    let team = state
        .store
        .get_team(team_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Team not found".to_string()))?;

    Ok(Json(Envelope::ok(entity_to_api_team(&team), "Team found")))
}

/// Lists the teams of a workspace.
pub async fn list_teams<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(workspace_id): Path<String>,
) -> ServerResult<Json<Envelope<ListTeamsResponse>>> {
    let workspace_id: Uuid = workspace_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    let teams = state.store.list_teams(workspace_id).await?;

    Ok(Json(Envelope::ok(
        ListTeamsResponse {
            teams: teams.iter().map(entity_to_api_team).collect(),
        },
        "Teams found",
    )))
}

/// Assigns a teacher to a team.
pub async fn assign_teacher<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<AssignTeacherRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Team>>> {
    require_teacher(&current, "manage teams")?;

    let team_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid team id".to_string()))?;
    let teacher_id: Uuid = request
        .teacher_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid teacher id".to_string()))?;

    let mut team = state
        .store
        .get_team(team_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Team not found".to_string()))?;

    let mut teacher = state
        .store
        .get_user(teacher_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;
    if teacher.role != Role::Teacher {
        return Err(ServerError::InvalidRequest(
            "Only teacher accounts can be assigned to a team".to_string(),
        ));
    }

    team.assign_teacher(teacher_id);
    team.updated_at = chrono::Utc::now();
    let team = state.store.update_team(team).await?;

    if !teacher.teams.contains(&team_id) {
        teacher.teams.push(team_id);
        teacher.updated_at = chrono::Utc::now();
        state.store.update_user(teacher).await?;
    }

    tracing::info!(team_id = %team_id, teacher_id = %teacher_id, "Teacher assigned to team");

    Ok(Json(Envelope::ok(entity_to_api_team(&team), "Teacher assigned")))
}

/// Grants a team access to a class.
pub async fn add_class<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<AddTeamClassRequest>,
) -> ServerResult<Json<Envelope<api_protocol::Team>>> {
    require_teacher(&current, "manage teams")?;

    let team_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid team id".to_string()))?;
    let class_id: Uuid = request
        .class_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid class id".to_string()))?;

    let mut team = state
        .store
        .get_team(team_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Team not found".to_string()))?;

    state
        .store
        .get_class(class_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Class not found".to_string()))?;

    team.add_class(class_id);
    team.updated_at = chrono::Utc::now();
    let team = state.store.update_team(team).await?;

    tracing::info!(team_id = %team_id, class_id = %class_id, "Class added to team");

    Ok(Json(Envelope::ok(entity_to_api_team(&team), "Class added")))
}

/// Deletes a team, removing its reference from the workspace.
pub async fn delete_team<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<()>>> {
    require_teacher(&current, "delete teams")?;

    let team_id: Uuid = id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid team id".to_string()))?;

    let team = state
        .store
        .get_team(team_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Team not found".to_string()))?;

    if let Some(mut workspace) = state.store.get_workspace(team.workspace_id).await? {
        workspace.teams.retain(|t| *t != team_id);
        workspace.updated_at = chrono::Utc::now();
        state.store.update_workspace(workspace).await?;
    }

    state.store.delete_team(team_id).await?;

    tracing::info!(team_id = %team_id, "Team deleted");

    Ok(Json(Envelope::ok((), "Team deleted")))
}
