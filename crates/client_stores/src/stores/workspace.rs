//! Workspace store, including the invitation workflow.

use std::sync::Arc;

use api_protocol::{
    CreateInvitationRequest, CreateInvitationResponse, CreateWorkspaceRequest, Invitation,
    ListInvitationsResponse, Role, UseInvitationRequest, ValidateInvitationResponse, Workspace,
};

use crate::{ApiClient, Cached, ClientResult};

/// Mirrors the workspace resource and its invitations.
pub struct WorkspaceStore {
    client: Arc<ApiClient>,
    selected: Cached<Workspace>,
    invitations: Cached<Vec<Invitation>>,
}

impl WorkspaceStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            selected: Cached::new(),
            invitations: Cached::new(),
        }
    }

    /// Returns the cached workspace, if any.
    pub fn workspace(&self) -> Option<Workspace> {
        self.selected.get()
    }

    /// Returns the cached invitation history, if any.
    pub fn invitations(&self) -> Option<Vec<Invitation>> {
        self.invitations.get()
    }

    /// Subscribes to workspace changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Workspace>> {
        self.selected.subscribe()
    }

    /// Creates a workspace.
    pub async fn create(&self, name: impl Into<String>) -> ClientResult<Workspace> {
        let workspace: Workspace = self
            .client
            .post("/workspaces", &CreateWorkspaceRequest { name: name.into() })
            .await?;
        self.selected.set(workspace.clone());
        Ok(workspace)
    }

    /// Fetches a workspace by id.
    pub async fn fetch(&self, id: &str) -> ClientResult<Workspace> {
        let workspace: Workspace = self.client.get(&format!("/workspaces/{id}")).await?;
        self.selected.set(workspace.clone());
        Ok(workspace)
    }

    /// Mints an invitation link for a workspace.
    pub async fn invite(
        &self,
        workspace_id: &str,
        role: Option<Role>,
    ) -> ClientResult<CreateInvitationResponse> {
        self.client
            .post(
                &format!("/workspace/{workspace_id}/invite"),
                &CreateInvitationRequest { role },
            )
            .await
    }

    /// Validates an invitation token without consuming it.
    pub async fn validate_invitation(
        &self,
        token: &str,
    ) -> ClientResult<ValidateInvitationResponse> {
        self.client
            .get(&format!("/invitation/validate/{token}"))
            .await
    }

    /// Redeems an invitation token for the signed-in user.
    pub async fn redeem_invitation(&self, token: &str) -> ClientResult<()> {
        self.client
            .post_unit(
                "/invitation/use",
                &UseInvitationRequest {
                    token: token.to_string(),
                },
            )
            .await
    }

    /// Fetches the invitation history of a workspace, newest first.
    pub async fn fetch_invitations(&self, workspace_id: &str) -> ClientResult<Vec<Invitation>> {
        let listing: ListInvitationsResponse = self
            .client
            .get(&format!("/workspace/{workspace_id}/invitations"))
            .await?;
        self.invitations.set(listing.invitations.clone());
        Ok(listing.invitations)
    }
}
