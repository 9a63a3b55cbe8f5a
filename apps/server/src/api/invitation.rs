//! Workspace invitation API endpoints.

use std::sync::Arc;

use api_protocol::{
    CreateInvitationRequest, CreateInvitationResponse, Envelope, ListInvitationsResponse,
    UseInvitationRequest, UserSummary, ValidateInvitationResponse,
};
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use class_store::ClassStore;
use entities::{Role, WorkspaceInvitation};
use uuid::Uuid;

use crate::api::user::{to_entity_role, user_summary};
use crate::api::workspace::entity_to_api_workspace;
use crate::error::{ServerError, ServerResult};
use crate::middleware::CurrentUser;
use crate::permissions::can_invite_members;
use crate::state::AppState;

/// Every failed lookup answers identically, so callers cannot tell a used
/// token from an expired or unknown one.
fn invalid_invitation() -> ServerError {
    ServerError::InvalidRequest("Invalid or expired invitation link".to_string())
}

fn entity_to_api_invitation(
    invitation: &WorkspaceInvitation,
    creator: Option<UserSummary>,
    used_by: Option<UserSummary>,
) -> api_protocol::Invitation {
    api_protocol::Invitation {
        id: invitation.id.to_string(),
        workspace_id: invitation.workspace_id.to_string(),
        token: invitation.token.clone(),
        expires_at: invitation.expires_at,
        is_used: invitation.is_used,
        used_at: invitation.used_at,
        allowed_role: crate::api::user::to_api_role(invitation.allowed_role),
        creator,
        used_by,
        created_at: invitation.created_at,
    }
}

/// Creates a single-use invitation link for a workspace.
pub async fn create_invitation<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(workspace_id): Path<String>,
    Extension(current): Extension<CurrentUser>,
    body: Option<Json<CreateInvitationRequest>>,
) -> ServerResult<Json<Envelope<CreateInvitationResponse>>> {
    let workspace_id: Uuid = workspace_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    if !can_invite_members(&state.store, workspace_id, current.id).await {
        return Err(ServerError::PermissionDenied(
            "Only teachers can invite members".to_string(),
        ));
    }

    state
        .store
        .get_workspace(workspace_id)
        .await?
        .ok_or_else(|| ServerError::NotFound("Workspace not found".to_string()))?;

    let allowed_role = body
        .and_then(|Json(request)| request.role)
        .map(to_entity_role)
        .unwrap_or(Role::Student);

    let invitation = state
        .store
        .create_invitation(WorkspaceInvitation::new(
            workspace_id,
            current.id,
            auth::generate_token(),
            allowed_role,
        ))
        .await?;

    let signup_link = format!(
        "{}/signup?invite={}",
        state.config.public_base(),
        urlencoding::encode(&invitation.token)
    );

    tracing::info!(
        invitation_id = %invitation.id,
        workspace_id = %workspace_id,
        allowed_role = %invitation.allowed_role,
        "Invitation created"
    );

    Ok(Json(Envelope::ok(
        CreateInvitationResponse {
            signup_link,
            expires_at: invitation.expires_at,
        },
        "Invitation created",
    )))
}

/// Validates an invitation token without consuming it.
pub async fn validate_invitation<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(token): Path<String>,
) -> ServerResult<Json<Envelope<ValidateInvitationResponse>>> {
    let now = Utc::now();

    let invitation = state
        .store
        .find_active_invitation(&token, now)
        .await?
        .ok_or_else(invalid_invitation)?;

    // A vanished workspace answers like a bad token.
    let workspace = state
        .store
        .get_workspace(invitation.workspace_id)
        .await?
        .ok_or_else(invalid_invitation)?;

    Ok(Json(Envelope::ok(
        ValidateInvitationResponse {
            valid: true,
            workspace: entity_to_api_workspace(&workspace),
            expires_at: invitation.expires_at,
        },
        "Invitation is valid",
    )))
}

/// Redeems an invitation token, enrolling the requester in its workspace.
pub async fn use_invitation<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(current): Extension<CurrentUser>,
    Json(request): Json<UseInvitationRequest>,
) -> ServerResult<Json<Envelope<()>>> {
    let now = Utc::now();

    let invitation = state
        .store
        .find_active_invitation(&request.token, now)
        .await?
        .ok_or_else(invalid_invitation)?;

    let mut user = state
        .store
        .get_user(current.id)
        .await?
        .ok_or_else(|| ServerError::NotFound("User not found".to_string()))?;

    if user.role != invitation.allowed_role {
        return Err(ServerError::PermissionDenied(format!(
            "This invitation requires a {} account, but yours is a {}",
            invitation.allowed_role, user.role
        )));
    }

    // Freshness is re-checked inside the conditional update; of two
    // concurrent redemptions, the loser lands here with None.
    let invitation = state
        .store
        .redeem_invitation(&request.token, user.id, now)
        .await?
        .ok_or_else(invalid_invitation)?;

    user.join_workspace(invitation.workspace_id);
    user.updated_at = now;
    state.store.update_user(user).await?;

    tracing::info!(
        invitation_id = %invitation.id,
        workspace_id = %invitation.workspace_id,
        user_id = %current.id,
        "Invitation redeemed"
    );

    Ok(Json(Envelope::ok((), "Successfully joined workspace")))
}

/// Lists a workspace's invitations, newest first, with creator and redeemer
/// identities resolved.
pub async fn list_invitations<S: ClassStore>(
    State(state): State<Arc<AppState<S>>>,
    Path(workspace_id): Path<String>,
    Extension(current): Extension<CurrentUser>,
) -> ServerResult<Json<Envelope<ListInvitationsResponse>>> {
    let workspace_id: Uuid = workspace_id
        .parse()
        .map_err(|_| ServerError::InvalidRequest("Invalid workspace id".to_string()))?;

    if !can_invite_members(&state.store, workspace_id, current.id).await {
        return Err(ServerError::PermissionDenied(
            "Only teachers can view invitations".to_string(),
        ));
    }

    let invitations = state.store.list_invitations(workspace_id).await?;

    let mut resolved = Vec::with_capacity(invitations.len());
    for invitation in &invitations {
        let creator = state
            .store
            .get_user(invitation.creator_id)
            .await?
            .as_ref()
            .map(user_summary);
        let used_by = match invitation.used_by {
            Some(user_id) => state.store.get_user(user_id).await?.as_ref().map(user_summary),
            None => None,
        };
        resolved.push(entity_to_api_invitation(invitation, creator, used_by));
    }

    Ok(Json(Envelope::ok(
        ListInvitationsResponse {
            invitations: resolved,
        },
        "Invitations found",
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::{create_shared_state, SharedState};
    use chrono::Duration;
    use class_store::MemoryClassStore;
    use entities::{User, Workspace};

    struct Fixture {
        state: SharedState<MemoryClassStore>,
        teacher: User,
        student: User,
        workspace: Workspace,
    }

    async fn fixture() -> Fixture {
        let config = Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            public_url: "http://localhost:5173".to_string(),
            log_level: "info".to_string(),
        };
        let state = create_shared_state(config, MemoryClassStore::new());

        let teacher = state
            .store
            .create_user(User::new(
                "teacher",
                "teacher@example.com",
                "hash",
                Role::Teacher,
                "tok-teacher",
            ))
            .await
            .unwrap();
        let student = state
            .store
            .create_user(User::new(
                "student",
                "student@example.com",
                "hash",
                Role::Student,
                "tok-student",
            ))
            .await
            .unwrap();
        let workspace = state
            .store
            .create_workspace(Workspace::new("Spring term", teacher.id))
            .await
            .unwrap();

        Fixture {
            state,
            teacher,
            student,
            workspace,
        }
    }

    fn token_from_link(link: &str) -> String {
        link.split("invite=").nth(1).unwrap().to_string()
    }

    async fn mint(fx: &Fixture, role: Option<api_protocol::Role>) -> String {
        let body = role.map(|role| Json(CreateInvitationRequest { role: Some(role) }));
        let Json(envelope) = create_invitation(
            State(fx.state.clone()),
            Path(fx.workspace.id.to_string()),
            Extension(CurrentUser::from(&fx.teacher)),
            body,
        )
        .await
        .unwrap();
        token_from_link(&envelope.response.unwrap().signup_link)
    }

    #[tokio::test]
    async fn test_invitation_lifecycle() {
        let fx = fixture().await;
        let token = mint(&fx, None).await;

        // Valid before use.
        let Json(envelope) = validate_invitation(
            State(fx.state.clone()),
            Path(token.clone()),
        )
        .await
        .unwrap();
        let payload = envelope.response.unwrap();
        assert!(payload.valid);
        assert_eq!(payload.workspace.id, fx.workspace.id.to_string());

        // Redeeming enrolls the student.
        use_invitation(
            State(fx.state.clone()),
            Extension(CurrentUser::from(&fx.student)),
            Json(UseInvitationRequest {
                token: token.clone(),
            }),
        )
        .await
        .unwrap();

        let student = fx.state.store.get_user(fx.student.id).await.unwrap().unwrap();
        assert_eq!(student.workspaces, vec![fx.workspace.id]);

        // The token is spent: validation and a second redemption both fail.
        let err = validate_invitation(State(fx.state.clone()), Path(token.clone()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));

        let other = fx
            .state
            .store
            .create_user(User::new(
                "student2",
                "student2@example.com",
                "hash",
                Role::Student,
                "tok-student2",
            ))
            .await
            .unwrap();
        let err = use_invitation(
            State(fx.state.clone()),
            Extension(CurrentUser::from(&other)),
            Json(UseInvitationRequest { token }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_students_cannot_mint_invitations() {
        let fx = fixture().await;

        let err = create_invitation(
            State(fx.state.clone()),
            Path(fx.workspace.id.to_string()),
            Extension(CurrentUser::from(&fx.student)),
            None,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ServerError::PermissionDenied(_)));
    }

    #[tokio::test]
    async fn test_role_mismatch_leaves_membership_untouched() {
        let fx = fixture().await;
        let token = mint(&fx, Some(api_protocol::Role::Teacher)).await;

        let err = use_invitation(
            State(fx.state.clone()),
            Extension(CurrentUser::from(&fx.student)),
            Json(UseInvitationRequest {
                token: token.clone(),
            }),
        )
        .await
        .unwrap_err();

        match err {
            ServerError::PermissionDenied(message) => {
                assert!(message.contains("teacher"));
                assert!(message.contains("student"));
            }
            other => panic!("expected PermissionDenied, got {other:?}"),
        }

        let student = fx.state.store.get_user(fx.student.id).await.unwrap().unwrap();
        assert!(student.workspaces.is_empty());

        // The token survives a refused redemption.
        assert!(fx
            .state
            .store
            .find_active_invitation(&token, Utc::now())
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_expired_token_is_rejected() {
        let fx = fixture().await;
        let mut invitation = WorkspaceInvitation::new(
            fx.workspace.id,
            fx.teacher.id,
            "tok-expired",
            Role::Student,
        );
        invitation.expires_at = Utc::now() - Duration::hours(1);
        fx.state.store.create_invitation(invitation).await.unwrap();

        let err = validate_invitation(State(fx.state.clone()), Path("tok-expired".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));

        let err = use_invitation(
            State(fx.state.clone()),
            Extension(CurrentUser::from(&fx.student)),
            Json(UseInvitationRequest {
                token: "tok-expired".to_string(),
            }),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ServerError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_two_invitations_one_membership() {
        let fx = fixture().await;
        let first = mint(&fx, None).await;
        let second = mint(&fx, None).await;

        for token in [first, second] {
            use_invitation(
                State(fx.state.clone()),
                Extension(CurrentUser::from(&fx.student)),
                Json(UseInvitationRequest { token }),
            )
            .await
            .unwrap();
        }

        let student = fx.state.store.get_user(fx.student.id).await.unwrap().unwrap();
        assert_eq!(student.workspaces, vec![fx.workspace.id]);
    }

    #[tokio::test]
    async fn test_history_resolves_identities_newest_first() {
        let fx = fixture().await;
        let first = mint(&fx, None).await;
        let _second = mint(&fx, None).await;

        use_invitation(
            State(fx.state.clone()),
            Extension(CurrentUser::from(&fx.student)),
            Json(UseInvitationRequest { token: first }),
        )
        .await
        .unwrap();

        let Json(envelope) = list_invitations(
            State(fx.state.clone()),
            Path(fx.workspace.id.to_string()),
            Extension(CurrentUser::from(&fx.teacher)),
        )
        .await
        .unwrap();
        let invitations = envelope.response.unwrap().invitations;

        assert_eq!(invitations.len(), 2);
        let redeemed: Vec<_> = invitations.iter().filter(|i| i.is_used).collect();
        assert_eq!(redeemed.len(), 1);
        assert_eq!(
            redeemed[0].used_by.as_ref().unwrap().email,
            "student@example.com"
        );
        for invitation in &invitations {
            assert_eq!(
                invitation.creator.as_ref().unwrap().email,
                "teacher@example.com"
            );
        }
    }
}
