//! Comment store.

use std::sync::Arc;

use api_protocol::{
    Comment, CommentKind, CreateCommentRequest, LikeResponse, ListCommentsResponse,
    UpdateCommentRequest,
};

use crate::{ApiClient, Cached, ClientResult};

/// Mirrors the comments of the currently open project.
pub struct CommentStore {
    client: Arc<ApiClient>,
    comments: Cached<Vec<Comment>>,
}

impl CommentStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            comments: Cached::new(),
        }
    }

    /// Returns the cached comments, if any.
    pub fn comments(&self) -> Option<Vec<Comment>> {
        self.comments.get()
    }

    /// Subscribes to comment list changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Vec<Comment>>> {
        self.comments.subscribe()
    }

    /// Fetches the comments of a project, oldest first.
    pub async fn fetch_for_project(&self, project_id: &str) -> ClientResult<Vec<Comment>> {
        let listing: ListCommentsResponse = self
            .client
            .get(&format!("/projects/{project_id}/comments"))
            .await?;
        self.comments.set(listing.comments.clone());
        Ok(listing.comments)
    }

    /// Posts a comment pinned to a video timecode.
    pub async fn create(
        &self,
        project_id: &str,
        content: impl Into<String>,
        kind: CommentKind,
        video_timestamp: impl Into<String>,
    ) -> ClientResult<Comment> {
        let comment: Comment = self
            .client
            .post(
                "/comments",
                &CreateCommentRequest {
                    content: content.into(),
                    project_id: project_id.to_string(),
                    kind,
                    video_timestamp: video_timestamp.into(),
                },
            )
            .await?;
        self.comments.update(|list| list.push(comment.clone()));
        Ok(comment)
    }

    /// Updates a comment's content or checked flag.
    pub async fn update(&self, id: &str, request: UpdateCommentRequest) -> ClientResult<Comment> {
        let comment: Comment = self.client.put(&format!("/comments/{id}"), &request).await?;
        self.comments.update(|list| {
            if let Some(cached) = list.iter_mut().find(|c| c.id == comment.id) {
                *cached = comment.clone();
            }
        });
        Ok(comment)
    }

    /// Toggles the signed-in user's like on a comment.
    pub async fn toggle_like(&self, id: &str) -> ClientResult<LikeResponse> {
        let like: LikeResponse = self
            .client
            .post_empty(&format!("/comments/{id}/like"))
            .await?;
        Ok(like)
    }

    /// Deletes a comment and drops it from the cached list.
    pub async fn remove(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/comments/{id}")).await?;
        self.comments.update(|list| list.retain(|c| c.id != id));
        Ok(())
    }
}
