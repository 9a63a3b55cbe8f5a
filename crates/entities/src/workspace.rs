//! Workspace-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A workspace is the top-level tenant grouping teams and classes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier.
    pub id: Uuid,
    /// Workspace display name.
    pub name: String,
    /// User who created the workspace.
    pub creator_id: Uuid,
    /// Teams in this workspace.
    pub teams: Vec<Uuid>,
    /// Classes in this workspace.
    pub classes: Vec<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    /// Creates a new workspace.
    pub fn new(name: impl Into<String>, creator_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            creator_id,
            teams: Vec::new(),
            classes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_creation() {
        let creator_id = Uuid::new_v4();
        let workspace = Workspace::new("Film Studies", creator_id);

        assert_eq!(workspace.name, "Film Studies");
        assert_eq!(workspace.creator_id, creator_id);
        assert!(workspace.teams.is_empty());
        assert!(workspace.classes.is_empty());
    }
}
