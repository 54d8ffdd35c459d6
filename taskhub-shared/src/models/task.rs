//! Task model
//!
//! A task is a named to-do item with a completion flag, owned by one user.
//! Tasks are never physically removed by normal operations: deleting a task
//! sets `deleted_at`, after which the row is invisible to every read.
//!
//! # State Machine
//!
//! ```text
//! Active --update--> Active
//! Active --delete--> Deleted   (terminal)
//! ```
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id UUID PRIMARY KEY,
//!     name TEXT NOT NULL,
//!     is_done BOOLEAN NOT NULL DEFAULT FALSE,
//!     owner_id UUID NOT NULL,
//!     deleted_at TIMESTAMPTZ
//! );
//! ```
//!
//! `owner_id` names a user by convention only; no foreign key is declared,
//! so a task may point at a user that does not exist or was deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RecordState;

/// Task model representing a to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4), assigned at creation and never changed
    pub id: Uuid,

    /// Display text
    pub name: String,

    /// Completion flag
    pub is_done: bool,

    /// User that owns this task
    pub owner_id: Uuid,

    /// Soft-delete state, decoded from the `deleted_at` column
    ///
    /// Never serialized.
    #[serde(skip)]
    #[sqlx(rename = "deleted_at", try_from = "Option<DateTime<Utc>>")]
    pub state: RecordState,
}

impl Task {
    /// Assembles a new active task with a freshly generated ID
    pub fn new(name: impl Into<String>, is_done: bool, owner_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            is_done,
            owner_id,
            state: RecordState::Active,
        }
    }

    /// Returns true unless the task has been soft-deleted
    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }
}

/// Partial update for a task
///
/// Every field is independently optional. `None` leaves the stored value
/// unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    /// New display text
    pub name: Option<String>,

    /// New completion flag
    pub is_done: Option<bool>,

    /// New owner
    pub owner_id: Option<Uuid>,
}

impl TaskPatch {
    /// Returns true when no field is set
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.is_done.is_none() && self.owner_id.is_none()
    }

    /// Merges every present field into `task` in one step
    pub fn apply_to(self, task: &mut Task) {
        if let Some(name) = self.name {
            task.name = name;
        }
        if let Some(is_done) = self.is_done {
            task.is_done = is_done;
        }
        if let Some(owner_id) = self.owner_id {
            task.owner_id = owner_id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_task_is_active() {
        let owner = Uuid::new_v4();
        let task = Task::new("write report", false, owner);

        assert_eq!(task.name, "write report");
        assert!(!task.is_done);
        assert_eq!(task.owner_id, owner);
        assert!(task.is_active());
    }

    #[test]
    fn test_new_task_ids_are_unique() {
        let owner = Uuid::new_v4();
        assert_ne!(Task::new("a", false, owner).id, Task::new("a", false, owner).id);
    }

    #[test]
    fn test_patch_name_only() {
        let owner = Uuid::new_v4();
        let mut task = Task::new("old", true, owner);

        TaskPatch {
            name: Some("new".to_string()),
            ..Default::default()
        }
        .apply_to(&mut task);

        assert_eq!(task.name, "new");
        assert!(task.is_done);
        assert_eq!(task.owner_id, owner);
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let mut task = Task::new("keep", false, Uuid::new_v4());
        let before = task.clone();

        let patch = TaskPatch::default();
        assert!(patch.is_empty());
        patch.apply_to(&mut task);

        assert_eq!(task, before);
    }

    #[test]
    fn test_serialization_hides_deletion_marker() {
        let mut task = Task::new("hidden", false, Uuid::new_v4());
        task.state = RecordState::Deleted { at: Utc::now() };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("state").is_none());
        assert!(json.get("deleted_at").is_none());
        assert_eq!(json["name"], "hidden");
        assert_eq!(json["owner_id"], task.owner_id.to_string());
    }
}
