//! Team entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team shares access to a subset of classes within a workspace.
///
/// Every team belongs to exactly one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier.
    pub id: Uuid,
    /// Team display name.
    pub name: String,
    /// User who created the team.
    pub creator_id: Uuid,
    /// Workspace this team belongs to.
    pub workspace_id: Uuid,
    /// Teachers assigned to this team.
    pub teachers: Vec<Uuid>,
    /// Classes this team can access.
    pub classes: Vec<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Creates a new team in the given workspace.
    pub fn new(name: impl Into<String>, creator_id: Uuid, workspace_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            creator_id,
            workspace_id,
            teachers: Vec::new(),
            classes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Assigns a teacher to this team. Assigning twice is a no-op.
    pub fn assign_teacher(&mut self, teacher_id: Uuid) {
        if !self.teachers.contains(&teacher_id) {
            self.teachers.push(teacher_id);
        }
    }

    /// Grants the team access to a class. Granting twice is a no-op.
    pub fn add_class(&mut self, class_id: Uuid) {
        if !self.classes.contains(&class_id) {
            self.classes.push(class_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assign_teacher_is_idempotent() {
        let mut team = Team::new("Group A", Uuid::new_v4(), Uuid::new_v4());
        let teacher_id = Uuid::new_v4();

        team.assign_teacher(teacher_id);
        team.assign_teacher(teacher_id);

        assert_eq!(team.teachers, vec![teacher_id]);
    }
}
