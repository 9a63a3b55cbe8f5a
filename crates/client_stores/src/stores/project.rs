//! Project store.

use std::sync::Arc;

use api_protocol::{CreateProjectRequest, Project, UpdateProjectRequest};

use crate::{ApiClient, Cached, ClientResult};

/// Mirrors the project resource.
pub struct ProjectStore {
    client: Arc<ApiClient>,
    selected: Cached<Project>,
}

impl ProjectStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            selected: Cached::new(),
        }
    }

    /// Returns the cached project, if any.
    pub fn project(&self) -> Option<Project> {
        self.selected.get()
    }

    /// Subscribes to project changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Project>> {
        self.selected.subscribe()
    }

    /// Fetches one project.
    pub async fn fetch(&self, id: &str) -> ClientResult<Project> {
        let project: Project = self.client.get(&format!("/projects/{id}")).await?;
        self.selected.set(project.clone());
        Ok(project)
    }

    /// Creates a project in a class.
    pub async fn create(&self, request: CreateProjectRequest) -> ClientResult<Project> {
        let project: Project = self.client.post("/projects", &request).await?;
        self.selected.set(project.clone());
        Ok(project)
    }

    /// Updates a project.
    pub async fn update(
        &self,
        id: &str,
        request: UpdateProjectRequest,
    ) -> ClientResult<Project> {
        let project: Project = self.client.put(&format!("/projects/{id}"), &request).await?;
        self.selected.set(project.clone());
        Ok(project)
    }

    /// Deletes a project. The server cascades to its comments and replies.
    pub async fn remove(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/projects/{id}")).await?;
        if self.selected.get().is_some_and(|p| p.id == id) {
            self.selected.clear();
        }
        Ok(())
    }
}
