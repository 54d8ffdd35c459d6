//! User model
//!
//! Users own tasks. The `tasks` field is a projection computed on demand from
//! the `tasks` table (active rows whose `owner_id` is this user's ID); it is
//! never stored on the `users` row and never written back.
//!
//! Passwords are stored and returned exactly as supplied. No hashing happens at
//! this layer.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE users (
//!     id UUID PRIMARY KEY,
//!     email TEXT NOT NULL,
//!     password TEXT NOT NULL,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
//!     deleted_at TIMESTAMPTZ,
//!     CONSTRAINT users_email_key UNIQUE (email)
//! );
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::task::Task;
use super::RecordState;

/// User model representing an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (UUID v4)
    pub id: Uuid,

    /// Email address, unique across all users
    pub email: String,

    /// Opaque credential string
    pub password: String,

    /// Active tasks owned by this user
    ///
    /// Empty unless the user was loaded together with its tasks.
    #[serde(default)]
    #[sqlx(skip)]
    pub tasks: Vec<Task>,

    /// When the user was created (maintained by the store)
    pub created_at: DateTime<Utc>,

    /// When the user was last updated (maintained by the store)
    pub updated_at: DateTime<Utc>,

    /// Soft-delete state, decoded from the `deleted_at` column
    #[serde(skip)]
    #[sqlx(rename = "deleted_at", try_from = "Option<DateTime<Utc>>")]
    pub state: RecordState,
}

impl User {
    /// Attaches a set of owned tasks, replacing any already present
    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }
}

/// Input for creating a new user
///
/// The ID is assigned by the caller; timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    /// Pre-generated user ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Credential string, stored as-is
    pub password: String,
}

impl NewUser {
    /// Assembles a new user with a freshly generated ID
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Partial update for a user
///
/// `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    /// New email address
    pub email: Option<String>,

    /// New credential string
    pub password: Option<String>,
}

impl UserPatch {
    /// Returns true when no field is set
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }

    /// Merges every present field into `user` in one step
    pub fn apply_to(self, user: &mut User) {
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(password) = self.password {
            user.password = password;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            email: "a@x.com".to_string(),
            password: "p".to_string(),
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            state: RecordState::Active,
        }
    }

    #[test]
    fn test_new_user() {
        let new_user = NewUser::new("a@x.com", "p");
        assert_eq!(new_user.email, "a@x.com");
        assert_eq!(new_user.password, "p");
        assert_ne!(new_user.id, NewUser::new("a@x.com", "p").id);
    }

    #[test]
    fn test_patch_password_only() {
        let mut user = sample_user();

        UserPatch {
            password: Some("secret".to_string()),
            ..Default::default()
        }
        .apply_to(&mut user);

        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.password, "secret");
    }

    #[test]
    fn test_update_user_default() {
        let patch = UserPatch::default();
        assert!(patch.is_empty());
        assert!(patch.email.is_none());
        assert!(patch.password.is_none());
    }

    #[test]
    fn test_with_tasks() {
        let user = sample_user();
        let task = Task::new("t", false, user.id);
        let user = user.with_tasks(vec![task.clone()]);

        assert_eq!(user.tasks, vec![task]);
    }

    #[test]
    fn test_serialization_shape() {
        let user = sample_user();
        let json = serde_json::to_value(&user).unwrap();

        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["password"], "p");
        assert!(json["tasks"].as_array().unwrap().is_empty());
        assert!(json.get("created_at").is_some());
        assert!(json.get("deleted_at").is_none());
    }
}
