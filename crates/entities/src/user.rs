//! User-related entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display name substituted for authors whose account has been deleted.
pub const DELETED_USER_NAME: &str = "Deleted User";

/// Sentinel identity assigned to content authored by deleted users.
///
/// This is not a real user record; lookups against it return nothing.
pub fn deleted_user_id() -> Uuid {
    Uuid::nil()
}

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Can create classes, manage workspaces and teams, and invite members.
    Teacher,
    /// Can post feedback on projects shared with them.
    Student,
}

impl Role {
    /// Returns the lowercase wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Unique email address.
    pub email: String,
    /// Salted credential digest.
    pub password_hash: String,
    /// Account role.
    pub role: Role,
    /// Optional profile image URL.
    pub profile_image: Option<String>,
    /// Teams this user belongs to.
    pub teams: Vec<Uuid>,
    /// Workspaces this user is a member of.
    pub workspaces: Vec<Uuid>,
    /// Comments this user has liked.
    pub liked_comments: Vec<Uuid>,
    /// Replies this user has liked.
    pub liked_replies: Vec<Uuid>,
    /// Opaque bearer access token. Regenerated only by re-authentication.
    pub access_token: String,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        access_token: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            profile_image: None,
            teams: Vec::new(),
            workspaces: Vec::new(),
            liked_comments: Vec::new(),
            liked_replies: Vec::new(),
            access_token: access_token.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets the profile image URL.
    pub fn with_profile_image(mut self, url: impl Into<String>) -> Self {
        self.profile_image = Some(url.into());
        self
    }

    /// Adds a workspace membership. Adding an existing membership is a no-op.
    pub fn join_workspace(&mut self, workspace_id: Uuid) {
        if !self.workspaces.contains(&workspace_id) {
            self.workspaces.push(workspace_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_creation() {
        let user = User::new("alice", "alice@example.com", "hash", Role::Teacher, "tok");

        assert_eq!(user.name, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(user.role, Role::Teacher);
        assert!(user.workspaces.is_empty());
    }

    #[test]
    fn test_join_workspace_is_idempotent() {
        let mut user = User::new("bob", "bob@example.com", "hash", Role::Student, "tok");
        let workspace_id = Uuid::new_v4();

        user.join_workspace(workspace_id);
        user.join_workspace(workspace_id);

        assert_eq!(user.workspaces, vec![workspace_id]);
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Teacher).unwrap(), "\"teacher\"");
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"student\"");
    }
}
