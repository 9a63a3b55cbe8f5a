//! Reply store.

use std::sync::Arc;

use api_protocol::{CreateReplyRequest, LikeResponse, Reply, UpdateReplyRequest};

use crate::{ApiClient, Cached, ClientResult};

/// Mirrors the replies of the currently open comment thread.
pub struct ReplyStore {
    client: Arc<ApiClient>,
    replies: Cached<Vec<Reply>>,
}

impl ReplyStore {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self {
            client,
            replies: Cached::new(),
        }
    }

    /// Returns the cached replies, if any.
    pub fn replies(&self) -> Option<Vec<Reply>> {
        self.replies.get()
    }

    /// Subscribes to reply list changes.
    pub fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<Vec<Reply>>> {
        self.replies.subscribe()
    }

    /// Posts a reply to a comment.
    pub async fn create(
        &self,
        comment_id: &str,
        content: impl Into<String>,
    ) -> ClientResult<Reply> {
        let reply: Reply = self
            .client
            .post(
                "/replies",
                &CreateReplyRequest {
                    content: content.into(),
                    comment_id: comment_id.to_string(),
                },
            )
            .await?;
        self.replies.update(|list| list.push(reply.clone()));
        Ok(reply)
    }

    /// Updates a reply's content or checked flag.
    pub async fn update(&self, id: &str, request: UpdateReplyRequest) -> ClientResult<Reply> {
        let reply: Reply = self.client.put(&format!("/replies/{id}"), &request).await?;
        self.replies.update(|list| {
            if let Some(cached) = list.iter_mut().find(|r| r.id == reply.id) {
                *cached = reply.clone();
            }
        });
        Ok(reply)
    }

    /// Toggles the signed-in user's like on a reply.
    pub async fn toggle_like(&self, id: &str) -> ClientResult<LikeResponse> {
        let like: LikeResponse = self
            .client
            .post_empty(&format!("/replies/{id}/like"))
            .await?;
        Ok(like)
    }

    /// Deletes a reply and drops it from the cached list.
    pub async fn remove(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/replies/{id}")).await?;
        self.replies.update(|list| list.retain(|r| r.id != id));
        Ok(())
    }
}
