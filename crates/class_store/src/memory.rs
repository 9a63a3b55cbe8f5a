//! In-memory content store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use entities::{
    deleted_user_id, Class, Comment, Project, Reply, Team, User, Workspace, WorkspaceInvitation,
};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{ClassStore, ClassStoreError, StoreResult};

/// In-memory content store.
///
/// Compound operations take every affected map's write lock before mutating,
/// in field declaration order, so each commits as a unit and lock acquisition
/// cannot deadlock.
#[derive(Debug, Default)]
pub struct MemoryClassStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    workspaces: Arc<RwLock<HashMap<Uuid, Workspace>>>,
    teams: Arc<RwLock<HashMap<Uuid, Team>>>,
    invitations: Arc<RwLock<HashMap<Uuid, WorkspaceInvitation>>>,
    classes: Arc<RwLock<HashMap<Uuid, Class>>>,
    projects: Arc<RwLock<HashMap<Uuid, Project>>>,
    comments: Arc<RwLock<HashMap<Uuid, Comment>>>,
    replies: Arc<RwLock<HashMap<Uuid, Reply>>>,
}

impl MemoryClassStore {
    /// Creates a new in-memory content store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ClassStore for MemoryClassStore {
    // =========================================================================
    // User operations
    // =========================================================================

    async fn create_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(ClassStoreError::already_exists("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn get_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.name == name).cloned())
    }

    async fn get_user_by_access_token(&self, token: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.access_token == token).cloned())
    }

    async fn update_user(&self, user: User) -> StoreResult<User> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(ClassStoreError::not_found("User", user.id.to_string()));
        }
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete_user(&self, id: Uuid) -> StoreResult<()> {
        let mut users = self.users.write().await;
        let mut comments = self.comments.write().await;
        let mut replies = self.replies.write().await;

        if !users.contains_key(&id) {
            return Err(ClassStoreError::not_found("User", id.to_string()));
        }

        let sentinel = deleted_user_id();
        let mut reassigned = 0usize;
        for comment in comments.values_mut().filter(|c| c.creator_id == id) {
            comment.creator_id = sentinel;
            reassigned += 1;
        }
        for reply in replies.values_mut().filter(|r| r.creator_id == id) {
            reply.creator_id = sentinel;
            reassigned += 1;
        }
        users.remove(&id);

        tracing::debug!(user_id = %id, reassigned, "User deleted, authored content reassigned");
        Ok(())
    }

    // =========================================================================
    // Workspace operations
    // =========================================================================

    async fn create_workspace(&self, workspace: Workspace) -> StoreResult<Workspace> {
        let mut workspaces = self.workspaces.write().await;
        if workspaces.contains_key(&workspace.id) {
            return Err(ClassStoreError::already_exists(
                "Workspace",
                workspace.id.to_string(),
            ));
        }
        workspaces.insert(workspace.id, workspace.clone());
        Ok(workspace)
    }

    async fn get_workspace(&self, id: Uuid) -> StoreResult<Option<Workspace>> {
        let workspaces = self.workspaces.read().await;
        Ok(workspaces.get(&id).cloned())
    }

    async fn update_workspace(&self, workspace: Workspace) -> StoreResult<Workspace> {
        let mut workspaces = self.workspaces.write().await;
        if !workspaces.contains_key(&workspace.id) {
            return Err(ClassStoreError::not_found(
                "Workspace",
                workspace.id.to_string(),
            ));
        }
        workspaces.insert(workspace.id, workspace.clone());
        Ok(workspace)
    }

    async fn delete_workspace(&self, id: Uuid) -> StoreResult<()> {
        let mut workspaces = self.workspaces.write().await;
        if workspaces.remove(&id).is_none() {
            return Err(ClassStoreError::not_found("Workspace", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Team operations
    // =========================================================================

    async fn create_team(&self, team: Team) -> StoreResult<Team> {
        let mut teams = self.teams.write().await;
        if teams.contains_key(&team.id) {
            return Err(ClassStoreError::already_exists("Team", team.id.to_string()));
        }
        teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn get_team(&self, id: Uuid) -> StoreResult<Option<Team>> {
        let teams = self.teams.read().await;
        Ok(teams.get(&id).cloned())
    }

    async fn list_teams(&self, workspace_id: Uuid) -> StoreResult<Vec<Team>> {
        let teams = self.teams.read().await;
        let mut result: Vec<Team> = teams
            .values()
            .filter(|t| t.workspace_id == workspace_id)
            .cloned()
            .collect();
        result.sort_by_key(|t| t.created_at);
        Ok(result)
    }

    async fn update_team(&self, team: Team) -> StoreResult<Team> {
        let mut teams = self.teams.write().await;
        if !teams.contains_key(&team.id) {
            return Err(ClassStoreError::not_found("Team", team.id.to_string()));
        }
        teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn delete_team(&self, id: Uuid) -> StoreResult<()> {
        let mut teams = self.teams.write().await;
        if teams.remove(&id).is_none() {
            return Err(ClassStoreError::not_found("Team", id.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Invitation operations
    // =========================================================================

    async fn create_invitation(
        &self,
        invitation: WorkspaceInvitation,
    ) -> StoreResult<WorkspaceInvitation> {
        let mut invitations = self.invitations.write().await;
        if invitations.contains_key(&invitation.id) {
            return Err(ClassStoreError::already_exists(
                "Invitation",
                invitation.id.to_string(),
            ));
        }
        invitations.insert(invitation.id, invitation.clone());
        Ok(invitation)
    }

    async fn find_active_invitation(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<WorkspaceInvitation>> {
        let invitations = self.invitations.read().await;
        Ok(invitations
            .values()
            .find(|i| i.token == token && i.is_active(now))
            .cloned())
    }

    async fn redeem_invitation(
        &self,
        token: &str,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> StoreResult<Option<WorkspaceInvitation>> {
        let mut invitations = self.invitations.write().await;
        // Check-and-mark under one write lock: at most one caller wins.
        match invitations
            .values_mut()
            .find(|i| i.token == token && i.is_active(now))
        {
            Some(invitation) => {
                invitation.mark_used(user_id, now);
                Ok(Some(invitation.clone()))
            }
            None => Ok(None),
        }
    }

    async fn list_invitations(&self, workspace_id: Uuid) -> StoreResult<Vec<WorkspaceInvitation>> {
        let invitations = self.invitations.read().await;
        let mut result: Vec<WorkspaceInvitation> = invitations
            .values()
            .filter(|i| i.workspace_id == workspace_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    // =========================================================================
    // Class operations
    // =========================================================================

    async fn create_class(&self, class: Class) -> StoreResult<Class> {
        let mut classes = self.classes.write().await;
        if classes.contains_key(&class.id) {
            return Err(ClassStoreError::already_exists(
                "Class",
                class.id.to_string(),
            ));
        }
        classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn get_class(&self, id: Uuid) -> StoreResult<Option<Class>> {
        let classes = self.classes.read().await;
        Ok(classes.get(&id).cloned())
    }

    async fn list_classes(&self) -> StoreResult<Vec<Class>> {
        let classes = self.classes.read().await;
        let mut result: Vec<Class> = classes.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update_class(&self, class: Class) -> StoreResult<Class> {
        let mut classes = self.classes.write().await;
        if !classes.contains_key(&class.id) {
            return Err(ClassStoreError::not_found("Class", class.id.to_string()));
        }
        classes.insert(class.id, class.clone());
        Ok(class)
    }

    async fn delete_class(&self, id: Uuid) -> StoreResult<()> {
        let mut classes = self.classes.write().await;
        let mut projects = self.projects.write().await;
        let mut comments = self.comments.write().await;
        let mut replies = self.replies.write().await;

        if !classes.contains_key(&id) {
            return Err(ClassStoreError::not_found("Class", id.to_string()));
        }

        // Children before parents: replies, comments, projects, class.
        let project_ids: Vec<Uuid> = projects
            .values()
            .filter(|p| p.class_id == id)
            .map(|p| p.id)
            .collect();
        let comment_ids: Vec<Uuid> = comments
            .values()
            .filter(|c| project_ids.contains(&c.project_id))
            .map(|c| c.id)
            .collect();

        replies.retain(|_, r| !comment_ids.contains(&r.comment_id));
        for comment_id in &comment_ids {
            comments.remove(comment_id);
        }
        for project_id in &project_ids {
            projects.remove(project_id);
        }
        classes.remove(&id);

        tracing::debug!(
            class_id = %id,
            projects = project_ids.len(),
            comments = comment_ids.len(),
            "Class deleted with cascade"
        );
        Ok(())
    }

    // =========================================================================
    // Project operations
    // =========================================================================

    async fn create_project(&self, project: Project) -> StoreResult<Project> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(ClassStoreError::already_exists(
                "Project",
                project.id.to_string(),
            ));
        }
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn get_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(&id).cloned())
    }

    async fn update_project(&self, project: Project) -> StoreResult<Project> {
        let mut projects = self.projects.write().await;
        if !projects.contains_key(&project.id) {
            return Err(ClassStoreError::not_found(
                "Project",
                project.id.to_string(),
            ));
        }
        projects.insert(project.id, project.clone());
        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<()> {
        let mut classes = self.classes.write().await;
        let mut projects = self.projects.write().await;
        let mut comments = self.comments.write().await;
        let mut replies = self.replies.write().await;

        let project = projects
            .get(&id)
            .cloned()
            .ok_or_else(|| ClassStoreError::not_found("Project", id.to_string()))?;

        let comment_ids: Vec<Uuid> = comments
            .values()
            .filter(|c| c.project_id == id)
            .map(|c| c.id)
            .collect();

        replies.retain(|_, r| !comment_ids.contains(&r.comment_id));
        for comment_id in &comment_ids {
            comments.remove(comment_id);
        }
        if let Some(class) = classes.get_mut(&project.class_id) {
            class.projects.retain(|p| *p != id);
        }
        projects.remove(&id);

        tracing::debug!(project_id = %id, comments = comment_ids.len(), "Project deleted with cascade");
        Ok(())
    }

    // =========================================================================
    // Comment operations
    // =========================================================================

    async fn create_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let mut comments = self.comments.write().await;
        if comments.contains_key(&comment.id) {
            return Err(ClassStoreError::already_exists(
                "Comment",
                comment.id.to_string(),
            ));
        }
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn get_comment(&self, id: Uuid) -> StoreResult<Option<Comment>> {
        let comments = self.comments.read().await;
        Ok(comments.get(&id).cloned())
    }

    async fn list_comments(&self, project_id: Uuid) -> StoreResult<Vec<Comment>> {
        let comments = self.comments.read().await;
        let mut result: Vec<Comment> = comments
            .values()
            .filter(|c| c.project_id == project_id)
            .cloned()
            .collect();
        result.sort_by_key(|c| c.created_at);
        Ok(result)
    }

    async fn update_comment(&self, comment: Comment) -> StoreResult<Comment> {
        let mut comments = self.comments.write().await;
        if !comments.contains_key(&comment.id) {
            return Err(ClassStoreError::not_found(
                "Comment",
                comment.id.to_string(),
            ));
        }
        comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete_comment(&self, id: Uuid) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        let mut comments = self.comments.write().await;
        let mut replies = self.replies.write().await;

        let comment = comments
            .get(&id)
            .cloned()
            .ok_or_else(|| ClassStoreError::not_found("Comment", id.to_string()))?;

        replies.retain(|_, r| r.comment_id != id);
        if let Some(project) = projects.get_mut(&comment.project_id) {
            project.comments.retain(|c| *c != id);
        }
        comments.remove(&id);
        Ok(())
    }

    // =========================================================================
    // Reply operations
    // =========================================================================

    async fn create_reply(&self, reply: Reply) -> StoreResult<Reply> {
        let mut replies = self.replies.write().await;
        if replies.contains_key(&reply.id) {
            return Err(ClassStoreError::already_exists(
                "Reply",
                reply.id.to_string(),
            ));
        }
        replies.insert(reply.id, reply.clone());
        Ok(reply)
    }

    async fn get_reply(&self, id: Uuid) -> StoreResult<Option<Reply>> {
        let replies = self.replies.read().await;
        Ok(replies.get(&id).cloned())
    }

    async fn update_reply(&self, reply: Reply) -> StoreResult<Reply> {
        let mut replies = self.replies.write().await;
        if !replies.contains_key(&reply.id) {
            return Err(ClassStoreError::not_found("Reply", reply.id.to_string()));
        }
        replies.insert(reply.id, reply.clone());
        Ok(reply)
    }

    async fn delete_reply(&self, id: Uuid) -> StoreResult<()> {
        let mut comments = self.comments.write().await;
        let mut replies = self.replies.write().await;

        let reply = replies
            .get(&id)
            .cloned()
            .ok_or_else(|| ClassStoreError::not_found("Reply", id.to_string()))?;

        if let Some(comment) = comments.get_mut(&reply.comment_id) {
            comment.replies.retain(|r| *r != id);
        }
        replies.remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use entities::{CommentKind, Role};

    fn teacher() -> User {
        User::new("teacher", "teacher@example.com", "hash", Role::Teacher, "tok-t")
    }

    fn student(name: &str) -> User {
        User::new(
            name,
            format!("{name}@example.com"),
            "hash",
            Role::Student,
            format!("tok-{name}"),
        )
    }

    async fn seed_class_tree(
        store: &MemoryClassStore,
    ) -> (Class, Project, Project, Comment, Reply) {
        let creator = Uuid::new_v4();

        let mut class = store.create_class(Class::new("Editing 101")).await.unwrap();
        let mut p1 = store
            .create_project(Project::new("Short film", class.id))
            .await
            .unwrap();
        let p2 = store
            .create_project(Project::new("Documentary", class.id))
            .await
            .unwrap();
        class.projects = vec![p1.id, p2.id];
        let class = store.update_class(class).await.unwrap();

        let mut comment = store
            .create_comment(Comment::new(
                "Audio clips here",
                p1.id,
                creator,
                CommentKind::Public,
                "01:30",
            ))
            .await
            .unwrap();
        p1.comments = vec![comment.id];
        let p1 = store.update_project(p1).await.unwrap();

        let reply = store
            .create_reply(Reply::new("Agreed", comment.id, creator))
            .await
            .unwrap();
        comment.replies = vec![reply.id];
        let comment = store.update_comment(comment).await.unwrap();

        (class, p1, p2, comment, reply)
    }

    #[tokio::test]
    async fn test_delete_class_cascades_to_all_descendants() {
        let store = MemoryClassStore::new();
        let (class, p1, p2, comment, reply) = seed_class_tree(&store).await;

        store.delete_class(class.id).await.unwrap();

        assert!(store.get_class(class.id).await.unwrap().is_none());
        assert!(store.get_project(p1.id).await.unwrap().is_none());
        assert!(store.get_project(p2.id).await.unwrap().is_none());
        assert!(store.get_comment(comment.id).await.unwrap().is_none());
        assert!(store.get_reply(reply.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_missing_class_mutates_nothing() {
        let store = MemoryClassStore::new();
        let (_, p1, _, comment, reply) = seed_class_tree(&store).await;

        let err = store.delete_class(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ClassStoreError::NotFound { .. }));

        assert!(store.get_project(p1.id).await.unwrap().is_some());
        assert!(store.get_comment(comment.id).await.unwrap().is_some());
        assert!(store.get_reply(reply.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_project_removes_class_reference() {
        let store = MemoryClassStore::new();
        let (class, p1, p2, comment, reply) = seed_class_tree(&store).await;

        store.delete_project(p1.id).await.unwrap();

        let class = store.get_class(class.id).await.unwrap().unwrap();
        assert_eq!(class.projects, vec![p2.id]);
        assert!(store.get_comment(comment.id).await.unwrap().is_none());
        assert!(store.get_reply(reply.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_comment_removes_project_reference_and_replies() {
        let store = MemoryClassStore::new();
        let (_, p1, _, comment, reply) = seed_class_tree(&store).await;

        store.delete_comment(comment.id).await.unwrap();

        let project = store.get_project(p1.id).await.unwrap().unwrap();
        assert!(project.comments.is_empty());
        assert!(store.get_reply(reply.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_user_reassigns_authored_content_to_sentinel() {
        let store = MemoryClassStore::new();
        let author = store.create_user(student("casey")).await.unwrap();
        let project_id = Uuid::new_v4();

        let comment = store
            .create_comment(Comment::new(
                "First pass",
                project_id,
                author.id,
                CommentKind::Public,
                "00:05",
            ))
            .await
            .unwrap();
        let reply = store
            .create_reply(Reply::new("Follow-up", comment.id, author.id))
            .await
            .unwrap();

        store.delete_user(author.id).await.unwrap();

        assert!(store.get_user(author.id).await.unwrap().is_none());
        let comment = store.get_comment(comment.id).await.unwrap().unwrap();
        let reply = store.get_reply(reply.id).await.unwrap().unwrap();
        assert_eq!(comment.creator_id, deleted_user_id());
        assert_eq!(reply.creator_id, deleted_user_id());
    }

    #[tokio::test]
    async fn test_delete_missing_user_aborts_without_writes() {
        let store = MemoryClassStore::new();
        let author = store.create_user(student("casey")).await.unwrap();
        let comment = store
            .create_comment(Comment::new(
                "Untouched",
                Uuid::new_v4(),
                author.id,
                CommentKind::Public,
                "00:05",
            ))
            .await
            .unwrap();

        let err = store.delete_user(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ClassStoreError::NotFound { .. }));

        let comment = store.get_comment(comment.id).await.unwrap().unwrap();
        assert_eq!(comment.creator_id, author.id);
    }

    #[tokio::test]
    async fn test_redeem_invitation_is_single_use() {
        let store = MemoryClassStore::new();
        let teacher = store.create_user(teacher()).await.unwrap();
        let workspace = store
            .create_workspace(Workspace::new("Spring term", teacher.id))
            .await
            .unwrap();
        store
            .create_invitation(WorkspaceInvitation::new(
                workspace.id,
                teacher.id,
                "tok-abc",
                Role::Student,
            ))
            .await
            .unwrap();

        let now = Utc::now();
        let first = store
            .redeem_invitation("tok-abc", Uuid::new_v4(), now)
            .await
            .unwrap();
        let second = store
            .redeem_invitation("tok-abc", Uuid::new_v4(), now)
            .await
            .unwrap();

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_expired_invitation_is_not_found_active_nor_redeemable() {
        let store = MemoryClassStore::new();
        let invitation = WorkspaceInvitation::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            "tok-old",
            Role::Student,
        );
        let after_expiry = invitation.expires_at + Duration::seconds(1);
        store.create_invitation(invitation).await.unwrap();

        assert!(store
            .find_active_invitation("tok-old", after_expiry)
            .await
            .unwrap()
            .is_none());
        assert!(store
            .redeem_invitation("tok-old", Uuid::new_v4(), after_expiry)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_list_invitations_newest_first() {
        let store = MemoryClassStore::new();
        let workspace_id = Uuid::new_v4();
        let creator_id = Uuid::new_v4();

        let mut older =
            WorkspaceInvitation::new(workspace_id, creator_id, "tok-1", Role::Student);
        older.created_at = Utc::now() - Duration::hours(2);
        let newer = WorkspaceInvitation::new(workspace_id, creator_id, "tok-2", Role::Student);

        store.create_invitation(older).await.unwrap();
        store.create_invitation(newer).await.unwrap();
        // Unrelated workspace stays out of the listing.
        store
            .create_invitation(WorkspaceInvitation::new(
                Uuid::new_v4(),
                creator_id,
                "tok-3",
                Role::Student,
            ))
            .await
            .unwrap();

        let listed = store.list_invitations(workspace_id).await.unwrap();
        let tokens: Vec<&str> = listed.iter().map(|i| i.token.as_str()).collect();
        assert_eq!(tokens, vec!["tok-2", "tok-1"]);
    }

    #[tokio::test]
    async fn test_delete_reply_removes_comment_reference() {
        let store = MemoryClassStore::new();
        let (_, _, _, comment, reply) = seed_class_tree(&store).await;

        store.delete_reply(reply.id).await.unwrap();

        let comment = store.get_comment(comment.id).await.unwrap().unwrap();
        assert!(comment.replies.is_empty());
        assert!(store.get_reply(reply.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_user_by_access_token() {
        let store = MemoryClassStore::new();
        let user = store.create_user(student("drew")).await.unwrap();

        let found = store
            .get_user_by_access_token("tok-drew")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, user.id);
        assert!(store
            .get_user_by_access_token("unknown")
            .await
            .unwrap()
            .is_none());
    }
}
