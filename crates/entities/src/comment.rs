//! Comment entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visibility and intent of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// A question the author expects an answer to.
    Question,
    /// Visible to everyone with access to the project.
    Public,
    /// Visible to the author and teachers only.
    Private,
}

/// A comment pinned to a timecode in a project's video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    /// Unique identifier.
    pub id: Uuid,
    /// Text content, at most 500 characters.
    pub content: String,
    /// Project this comment is on.
    pub project_id: Uuid,
    /// User who wrote the comment.
    pub creator_id: Uuid,
    /// Comment kind.
    pub kind: CommentKind,
    /// Whether a teacher has checked this comment off.
    pub checked: bool,
    /// Position in the video, as displayed (e.g. "02:41").
    pub video_timestamp: String,
    /// Users who liked this comment.
    pub likes: Vec<Uuid>,
    /// Replies to this comment.
    pub replies: Vec<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    /// Creates a new comment.
    pub fn new(
        content: impl Into<String>,
        project_id: Uuid,
        creator_id: Uuid,
        kind: CommentKind,
        video_timestamp: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            project_id,
            creator_id,
            kind,
            checked: false,
            video_timestamp: video_timestamp.into(),
            likes: Vec::new(),
            replies: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Toggles the given user's like. Returns true if the comment is liked
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_like() {
        let mut comment = Comment::new(
            "Nice cut",
            Uuid::new_v4(),
            Uuid::new_v4(),
            CommentKind::Public,
            "00:12",
        );
        let user_id = Uuid::new_v4();

        assert!(comment.toggle_like(user_id));
        assert_eq!(comment.likes, vec![user_id]);
        assert!(!comment.toggle_like(user_id));
        assert!(comment.likes.is_empty());
    }

    #[test]
    fn test_kind_wire_format() {
        assert_eq!(
            serde_json::to_string(&CommentKind::Question).unwrap(),
            "\"question\""
        );
        assert_eq!(
            serde_json::to_string(&CommentKind::Private).unwrap(),
            "\"private\""
        );
    }
}
