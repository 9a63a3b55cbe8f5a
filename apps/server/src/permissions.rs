//! Permission predicates.

use class_store::ClassStore;
use entities::Role;
use uuid::Uuid;

/// Returns true if the user may invite members to the workspace.
///
/// Fails closed: an absent user or a lookup error both deny. The check is
/// role-only; the workspace id is accepted but not consulted, so membership
/// in the workspace is not required.
pub async fn can_invite_members<S: ClassStore>(
    store: &S,
    _workspace_id: Uuid,
    user_id: Uuid,
) -> bool {
    match store.get_user(user_id).await {
        Ok(Some(user)) => user.role == Role::Teacher,
        Ok(None) => false,
        Err(err) => {
            tracing::warn!(error = %err, user_id = %user_id, "Permission lookup failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use class_store::MemoryClassStore;
    use entities::User;

    #[tokio::test]
    async fn test_teacher_may_invite() {
        let store = MemoryClassStore::new();
        let teacher = store
            .create_user(User::new(
                "teacher",
                "teacher@example.com",
                "hash",
                Role::Teacher,
                "tok",
            ))
            .await
            .unwrap();

        assert!(can_invite_members(&store, Uuid::new_v4(), teacher.id).await);
    }

    #[tokio::test]
    async fn test_student_may_not_invite() {
        let store = MemoryClassStore::new();
        let student = store
            .create_user(User::new(
                "student",
                "student@example.com",
                "hash",
                Role::Student,
                "tok",
            ))
            .await
            .unwrap();

        assert!(!can_invite_members(&store, Uuid::new_v4(), student.id).await);
    }

    #[tokio::test]
    async fn test_unknown_user_fails_closed() {
        let store = MemoryClassStore::new();
        assert!(!can_invite_members(&store, Uuid::new_v4(), Uuid::new_v4()).await);
    }
}
