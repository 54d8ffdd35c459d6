//! Entity definitions for TaskHub
//!
//! # Models
//!
//! - `user`: user accounts, the owning side of the relationship
//! - `task`: to-do items, each owned by exactly one user
//!
//! Both entities carry a [`RecordState`] decoded from their `deleted_at`
//! column. Rows in the `Deleted` state are invisible to every repository read.
//!
//! # Example
//!
//! ```
//! use taskhub_shared::models::task::{Task, TaskPatch};
//! use uuid::Uuid;
//!
//! let mut task = Task::new("write report", false, Uuid::new_v4());
//! TaskPatch { is_done: Some(true), ..Default::default() }.apply_to(&mut task);
//!
//! assert!(task.is_done);
//! assert_eq!(task.name, "write report");
//! ```

use chrono::{DateTime, Utc};

pub mod task;
pub mod user;

/// Soft-delete state of a stored record
///
/// Stored as a nullable `deleted_at` timestamp: `NULL` is `Active`, any value
/// is `Deleted`. There is no transition back to `Active`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RecordState {
    /// Visible to normal reads
    #[default]
    Active,

    /// Soft-deleted at the given instant
    Deleted {
        /// When the record was marked deleted
        at: DateTime<Utc>,
    },
}

impl RecordState {
    /// Returns true when the record is visible to normal reads
    pub fn is_active(&self) -> bool {
        matches!(self, RecordState::Active)
    }

    /// Value for the `deleted_at` column
    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordState::Active => None,
            RecordState::Deleted { at } => Some(*at),
        }
    }
}

impl From<Option<DateTime<Utc>>> for RecordState {
    fn from(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            None => RecordState::Active,
            Some(at) => RecordState::Deleted { at },
        }
    }
}
