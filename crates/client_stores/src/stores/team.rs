//! Team store.

use std::sync::Arc;

use api_protocol::{
    AddTeamClassRequest, AssignTeacherRequest, CreateTeamRequest, ListTeamsResponse, Team,
};

use crate::{ApiClient, Cached, ClientResult};

/// Mirrors the teams of the currently open workspace.
pub struct TeamStore {
    client: Arc<ApiClient>,
    teams: Cached<Vec<Team>>,
}

impl TeamStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            teams: Cached::new(),
        }
    }

    /// Returns the cached teams, if any.
    pub fn teams(&self) -> Option<Vec<Team>> {
        self.teams.get()
    }

    /// Subscribes to team list changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Vec<Team>>> {
        self.teams.subscribe()
    }

    /// Fetches the teams of a workspace.
    pub async fn fetch_for_workspace(&self, workspace_id: &str) -> ClientResult<Vec<Team>> {
        let listing: ListTeamsResponse = self
            .client
            .get(&format!("/workspaces/{workspace_id}/teams"))
            .await?;
        self.teams.set(listing.teams.clone());
        Ok(listing.teams)
    }

    /// Creates a team in a workspace.
    pub async fn create(
        &self,
        workspace_id: &str,
        name: impl Into<String>,
    ) -> ClientResult<Team> {
        let team: Team = self
            .client
            .post(
                "/teams",
                &CreateTeamRequest {
                    name: name.into(),
                    workspace_id: workspace_id.to_string(),
                },
            )
            .await?;
        self.teams.update(|list| list.push(team.clone()));
        Ok(team)
    }

    /// Assigns a teacher to a team.
    pub async fn assign_teacher(&self, team_id: &str, teacher_id: &str) -> ClientResult<Team> {
        let team: Team = self
            .client
            .post(
                &format!("/teams/{team_id}/teachers"),
                &AssignTeacherRequest {
                    teacher_id: teacher_id.to_string(),
                },
            )
            .await?;
        self.replace_cached(team.clone());
        Ok(team)
    }

    /// Grants a team access to a class.
    pub async fn add_class(&self, team_id: &str, class_id: &str) -> ClientResult<Team> {
        let team: Team = self
            .client
            .post(
                &format!("/teams/{team_id}/classes"),
                &AddTeamClassRequest {
                    class_id: class_id.to_string(),
                },
            )
            .await?;
        self.replace_cached(team.clone());
        Ok(team)
    }

    /// Deletes a team and drops it from the cached list.
    pub async fn remove(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/teams/{id}")).await?;
        self.teams.update(|list| list.retain(|t| t.id != id));
        Ok(())
    }

    fn replace_cached(&self, team: Team) {
        self.teams.update(|list| {
            if let Some(cached) = list.iter_mut().find(|t| t.id == team.id) {
                *cached = team.clone();
            }
        });
    }
}
