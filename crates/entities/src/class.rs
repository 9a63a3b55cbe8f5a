//! Class entity definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A class groups projects for a course.
///
/// Deleting a class cascades to its projects and their feedback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Class {
    /// Unique identifier.
    pub id: Uuid,
    /// Class title.
    pub title: String,
    /// Projects in this class.
    pub projects: Vec<Uuid>,
    /// When this record was created.
    pub created_at: DateTime<Utc>,
    /// When this record was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Class {
    /// Creates a new class.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            projects: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}
