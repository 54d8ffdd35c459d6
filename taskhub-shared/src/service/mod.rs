//! Business rules for the task and user lifecycles
//!
//! Services sit between the API layer and the repositories. They assign
//! identifiers, apply partial updates with a read-modify-write cycle, compose
//! a user with its tasks, and wrap every repository error with the operation
//! that failed.
//!
//! The traits are object safe; the API layer holds them as `Arc<dyn …>`.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taskhub_shared::repository::InMemoryStore;
//! use taskhub_shared::service::{TaskService, TaskServiceImpl, UserService, UserServiceImpl};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryStore::new());
//! let users = UserServiceImpl::new(store.clone());
//! let tasks = TaskServiceImpl::new(store);
//!
//! let user = users.create_user("a@x.com".into(), "p".into()).await?;
//! tasks.create_task("write report".into(), false, user.id).await?;
//!
//! let loaded = users.get_user_with_tasks(user.id).await?;
//! assert_eq!(loaded.tasks.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod task;
pub mod user;

pub use task::{TaskService, TaskServiceImpl};
pub use user::{UserService, UserServiceImpl};

/// Repository doubles shared by the service tests
#[cfg(test)]
pub(crate) mod testing {
    use async_trait::async_trait;
    use uuid::Uuid;

    use crate::error::{RepoError, RepoResult};
    use crate::models::task::Task;
    use crate::models::user::{NewUser, User};
    use crate::repository::{TaskRepository, UserRepository};

    /// Repository whose every call fails like a dropped connection
    pub(crate) struct BrokenStore;

    fn broken<T>() -> RepoResult<T> {
        Err(RepoError::Store(sqlx::Error::PoolTimedOut))
    }

    #[async_trait]
    impl TaskRepository for BrokenStore {
        async fn get_all(&self) -> RepoResult<Vec<Task>> {
            broken()
        }

        async fn get_by_id(&self, _id: Uuid) -> RepoResult<Task> {
            broken()
        }

        async fn get_by_owner(&self, _owner_id: Uuid) -> RepoResult<Vec<Task>> {
            broken()
        }

        async fn create(&self, _task: Task) -> RepoResult<Task> {
            broken()
        }

        async fn update(&self, _task: Task) -> RepoResult<Task> {
            broken()
        }

        async fn delete(&self, _id: Uuid) -> RepoResult<()> {
            broken()
        }
    }

    #[async_trait]
    impl UserRepository for BrokenStore {
        async fn email_exists(&self, _email: &str) -> RepoResult<bool> {
            broken()
        }

        async fn create(&self, _user: NewUser) -> RepoResult<User> {
            broken()
        }

        async fn get_by_id(&self, _id: Uuid) -> RepoResult<User> {
            broken()
        }

        async fn get_all(&self) -> RepoResult<Vec<User>> {
            broken()
        }

        async fn update(&self, _user: User) -> RepoResult<User> {
            broken()
        }

        async fn delete(&self, _id: Uuid) -> RepoResult<()> {
            broken()
        }

        async fn get_tasks_for_user(&self, _owner_id: Uuid) -> RepoResult<Vec<Task>> {
            broken()
        }

        async fn get_user_with_tasks(&self, _owner_id: Uuid) -> RepoResult<User> {
            broken()
        }
    }
}
