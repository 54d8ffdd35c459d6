//! In-memory store for testing and database-less runs
//!
//! [`InMemoryStore`] implements both [`TaskRepository`] and [`UserRepository`]
//! over a single lock, with the same observable behavior as the PostgreSQL
//! repositories:
//!
//! - reads only return active rows
//! - task deletes are soft, user deletes are hard
//! - email uniqueness is checked under the write lock, so it is atomic
//! - `created_at`/`updated_at` are maintained by the store
//!
//! Rows are kept in insertion order.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taskhub_shared::models::user::NewUser;
//! use taskhub_shared::repository::{InMemoryStore, UserRepository};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! store.create(NewUser::new("a@x.com", "p")).await?;
//! assert!(store.email_exists("a@x.com").await?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{TaskRepository, UserRepository};
use crate::error::{Entity, RepoError, RepoResult};
use crate::models::task::Task;
use crate::models::user::{NewUser, User};
use crate::models::RecordState;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    tasks: Vec<Task>,
}

impl Tables {
    fn active_tasks_by_owner(&self, owner_id: Uuid) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.is_active() && task.owner_id == owner_id)
            .cloned()
            .collect()
    }

    fn active_user(&self, id: Uuid) -> Option<&User> {
        self.users
            .iter()
            .find(|user| user.id == id && user.state.is_active())
    }
}

/// Process-local store implementing both repository traits
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every task row, soft-deleted ones included
    pub async fn tasks_including_deleted(&self) -> Vec<Task> {
        self.tables.read().await.tasks.clone()
    }
}

#[async_trait]
impl TaskRepository for InMemoryStore {
    async fn get_all(&self) -> RepoResult<Vec<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .filter(|task| task.is_active())
            .cloned()
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Task> {
        let tables = self.tables.read().await;
        tables
            .tasks
            .iter()
            .find(|task| task.id == id && task.is_active())
            .cloned()
            .ok_or_else(|| RepoError::not_found(Entity::Task, id))
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Task>> {
        Ok(self.tables.read().await.active_tasks_by_owner(owner_id))
    }

    async fn create(&self, task: Task) -> RepoResult<Task> {
        let mut tables = self.tables.write().await;

        if tables.tasks.iter().any(|existing| existing.id == task.id) {
            return Err(RepoError::Store(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint \"tasks_pkey\": {}",
                task.id
            ))));
        }

        tables.tasks.push(task.clone());
        info!(task_id = %task.id, owner_id = %task.owner_id, "Task created");
        Ok(task)
    }

    async fn update(&self, task: Task) -> RepoResult<Task> {
        let mut tables = self.tables.write().await;

        let saved = match tables.tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(existing) if !existing.is_active() => {
                warn!(task_id = %task.id, "Update matched a deleted task");
                return Err(RepoError::not_found(Entity::Task, task.id));
            }
            Some(existing) => {
                existing.name = task.name;
                existing.is_done = task.is_done;
                existing.owner_id = task.owner_id;
                existing.clone()
            }
            None => {
                tables.tasks.push(task.clone());
                task
            }
        };

        info!(task_id = %saved.id, "Task saved");
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;

        match tables
            .tasks
            .iter_mut()
            .find(|task| task.id == id && task.is_active())
        {
            Some(task) => {
                task.state = RecordState::Deleted { at: Utc::now() };
                info!(task_id = %id, "Task soft-deleted");
                Ok(())
            }
            None => {
                warn!(task_id = %id, "Delete matched no active task");
                Err(RepoError::not_found(Entity::Task, id))
            }
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().any(|user| user.email == email))
    }

    async fn create(&self, user: NewUser) -> RepoResult<User> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|existing| existing.email == user.email) {
            warn!(email = %user.email, "Rejected user with duplicate email");
            return Err(RepoError::email_exists(user.email));
        }

        let now = Utc::now();
        let created = User {
            id: user.id,
            email: user.email,
            password: user.password,
            tasks: Vec::new(),
            created_at: now,
            updated_at: now,
            state: RecordState::Active,
        };
        tables.users.push(created.clone());

        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<User> {
        let tables = self.tables.read().await;
        tables
            .active_user(id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(Entity::User, id))
    }

    async fn get_all(&self) -> RepoResult<Vec<User>> {
        let tables = self.tables.read().await;
        let users: Vec<User> = tables
            .users
            .iter()
            .filter(|user| user.state.is_active())
            .cloned()
            .collect();

        debug!(count = users.len(), "Fetched active users");
        Ok(users)
    }

    async fn update(&self, user: User) -> RepoResult<User> {
        let mut tables = self.tables.write().await;

        let index = tables
            .users
            .iter()
            .position(|existing| existing.id == user.id && existing.state.is_active())
            .ok_or_else(|| RepoError::not_found(Entity::User, user.id))?;

        let taken = tables
            .users
            .iter()
            .any(|other| other.id != user.id && other.email == user.email);
        if taken {
            return Err(RepoError::email_exists(user.email));
        }

        let existing = &mut tables.users[index];
        existing.email = user.email;
        existing.password = user.password;
        existing.updated_at = Utc::now();

        info!(user_id = %existing.id, "User saved");
        Ok(existing.clone())
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let mut tables = self.tables.write().await;
        let before = tables.users.len();
        tables
            .users
            .retain(|user| !(user.id == id && user.state.is_active()));

        if tables.users.len() == before {
            warn!(user_id = %id, "Delete matched no user");
            return Err(RepoError::not_found(Entity::User, id));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn get_tasks_for_user(&self, owner_id: Uuid) -> RepoResult<Vec<Task>> {
        Ok(self.tables.read().await.active_tasks_by_owner(owner_id))
    }

    async fn get_user_with_tasks(&self, owner_id: Uuid) -> RepoResult<User> {
        let tables = self.tables.read().await;
        let user = tables
            .active_user(owner_id)
            .cloned()
            .ok_or_else(|| RepoError::not_found(Entity::User, owner_id))?;

        Ok(user.with_tasks(tables.active_tasks_by_owner(owner_id)))
    }
}
