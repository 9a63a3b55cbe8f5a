//! Content store trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{
    Class, Comment, Project, Reply, Team, User, Workspace, WorkspaceInvitation,
};
use uuid::Uuid;

use crate::StoreResult;

/// Trait for content storage operations.
///
/// Single-entity operations follow a create/get/update/delete shape. The
/// compound operations (`delete_user`, `delete_class`, `delete_project`,
/// `delete_comment`, `redeem_invitation`) are part of the trait so each
/// backend can execute them atomically with respect to its own writes.
#[async_trait]
pub trait ClassStore: Send + Sync {
    // =========================================================================
    // User operations
    // =========================================================================

    /// Creates a new user.
    async fn create_user(&self, user: User) -> StoreResult<User>;

    /// Gets a user by ID.
    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Gets a user by email.
    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    /// Gets a user by display name.
    async fn get_user_by_name(&self, name: &str) -> StoreResult<Option<User>>;

    /// Gets a user by their stored bearer access token.
    async fn get_user_by_access_token(&self, token: &str) -> StoreResult<Option<User>>;

    /// Updates a user.
    async fn update_user(&self, user: User) -> StoreResult<User>;

    /// Deletes a user, reassigning all comments and replies they authored to
    /// the sentinel deleted-user identity. Commits or aborts as a unit; an
    /// absent user aborts with no writes.
    async fn delete_user(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Workspace operations
    // =========================================================================

    /// Creates a new workspace.
    async fn create_workspace(&self, workspace: Workspace) -> StoreResult<Workspace>;

    /// Gets a workspace by ID.
    async fn get_workspace(&self, id: Uuid) -> StoreResult<Option<Workspace>>;

    /// Updates a workspace.
    async fn update_workspace(&self, workspace: Workspace) -> StoreResult<Workspace>;

    /// Deletes a workspace. Does not cascade.
    async fn delete_workspace(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Team operations
    // =========================================================================

    /// Creates a new team.
    async fn create_team(&self, team: Team) -> StoreResult<Team>;

    /// Gets a team by ID.
    async fn get_team(&self, id: Uuid) -> StoreResult<Option<Team>>;

    /// Lists the teams of a workspace.
    async fn list_teams(&self, workspace_id: Uuid) -> StoreResult<Vec<Team>>;

    /// Updates a team.
    async fn update_team(&self, team: Team) -> StoreResult<Team>;

    /// Deletes a team.
    async fn delete_team(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Invitation operations
    // =========================================================================

    /// Persists a new invitation.
    async fn create_invitation(
        &self,
        invitation: WorkspaceInvitation,
    ) -> StoreResult<WorkspaceInvitation>;

    /// Finds an invitation by token that is unused and unexpired at `now`.
    ///
    /// Not found, already used, and expired all yield `None`; callers cannot
    /// distinguish the reasons.
    async fn find_active_invitation(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<WorkspaceInvitation>>;

    /// Atomically marks the invitation for `token` as used by `user_id`,
    /// but only if it is unused and unexpired at `now`. Returns the redeemed
    /// invitation, or `None` if no active invitation matched.
    ///
    /// The conditional update closes the window between a validation check
    /// and redemption: of two concurrent redemptions, at most one succeeds.
    async fn redeem_invitation(
        &self,
        token: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<WorkspaceInvitation>>;

    /// Lists all invitations for a workspace, newest first. Used and expired
    /// invitations remain queryable for history.
    async fn list_invitations(&self, workspace_id: Uuid) -> StoreResult<Vec<WorkspaceInvitation>>;

    // =========================================================================
    // Class operations
    // =========================================================================

    /// Creates a new class.
    async fn create_class(&self, class: Class) -> StoreResult<Class>;

    /// Gets a class by ID.
    async fn get_class(&self, id: Uuid) -> StoreResult<Option<Class>>;

    /// Lists all classes, newest first.
    async fn list_classes(&self) -> StoreResult<Vec<Class>>;

    /// Updates a class.
    async fn update_class(&self, class: Class) -> StoreResult<Class>;

    /// Deletes a class and cascades to its projects, their comments, and
    /// their replies. Commits or aborts as a unit; an absent class aborts
    /// with no writes.
    async fn delete_class(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Project operations
    // =========================================================================

    /// Creates a new project.
    async fn create_project(&self, project: Project) -> StoreResult<Project>;

    /// Gets a project by ID.
    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Updates a project.
    async fn update_project(&self, project: Project) -> StoreResult<Project>;

    /// Deletes a project and cascades to its comments and their replies,
    /// removing the project's reference from its class. Commits or aborts as
    /// a unit.
    async fn delete_project(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Comment operations
    // =========================================================================

    /// Creates a new comment.
    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment>;

    /// Gets a comment by ID.
    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>>;

    /// Lists the comments on a project, oldest first.
    async fn list_comments(&self, project_id: Uuid) -> StoreResult<Vec<Comment>>;

    /// Updates a comment.
    async fn update_comment(&self, comment: Comment) -> StoreResult<Comment>;

    /// Deletes a comment and its replies, removing the comment's reference
    /// from its project. Commits or aborts as a unit.
    async fn delete_comment(&self, id: Uuid) -> StoreResult<()>;

    // =========================================================================
    // Reply operations
    // =========================================================================

    /// Creates a new reply.
    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply>;

    /// Gets a reply by ID.
    async fn get_reply(&self, id: Uuid) -> StoreResult<Option<Reply>>;

    /// Updates a reply.
    async fn update_reply(&self, reply: Reply) -> StoreResult<Reply>;

    /// Deletes a reply, removing its reference from the parent comment.
    async fn delete_reply(&self, id: Uuid) -> StoreResult<()>;
}
