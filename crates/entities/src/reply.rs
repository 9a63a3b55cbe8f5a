//! Reply entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reply to a comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    /// Unique identifier.
    pub id: Uuid,
    /// Text content, at most 500 characters.
    pub content: String,
    /// Comment this reply answers.
    pub comment_id: Uuid,
    /// User who wrote the reply.
    pub creator_id: Uuid,
    /// Whether a teacher has checked this reply off.
    pub checked: bool,
    /// Users who liked this reply.
    pub likes: Vec<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Reply {
    /// Creates a new reply.
    pub fn new(content: impl Into<String>, comment_id: Uuid, creator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            comment_id,
            creator_id,
            checked: false,
            likes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Toggles the given user's like. Returns true if the reply is liked
    /// after the call.
    pub fn toggle_like(&mut self, user_id: Uuid) -> bool {
        if let Some(pos) = self.likes.iter().position(|id| *id == user_id) {
            self.likes.remove(pos);
            false
        } else {
            self.likes.push(user_id);
            true
        }
    }
}
