//! Data-access layer
//!
//! Repositories translate entity operations into store queries. Two backends
//! implement the same traits:
//!
//! - `task` / `user`: [`PgTaskRepository`] and [`PgUserRepository`], each
//!   built around an injected `PgPool`
//! - `memory`: [`InMemoryStore`], a process-local store implementing both
//!   traits with identical semantics (used by tests and database-less runs)
//!
//! # Visibility
//!
//! Every read, update and delete is restricted to active rows
//! (`deleted_at IS NULL`). The predicate lives in the `active_rows!` macro
//! below and is spliced into each query at compile time.
//!
//! # Errors
//!
//! - "no row" and "zero rows affected" become [`RepoError::NotFound`]
//! - a duplicate `users.email` becomes [`RepoError::EmailExists`]
//! - anything else is [`RepoError::Store`]
//!
//! [`RepoError::NotFound`]: crate::error::RepoError::NotFound
//! [`RepoError::EmailExists`]: crate::error::RepoError::EmailExists
//! [`RepoError::Store`]: crate::error::RepoError::Store

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::RepoResult;
use crate::models::task::Task;
use crate::models::user::{NewUser, User};

/// Predicate selecting rows that have not been soft-deleted
macro_rules! active_rows {
    () => {
        "deleted_at IS NULL"
    };
}

/// Column list for `tasks` queries
macro_rules! task_columns {
    () => {
        "id, name, is_done, owner_id, deleted_at"
    };
}

/// Column list for `users` queries
macro_rules! user_columns {
    () => {
        "id, email, password, created_at, updated_at, deleted_at"
    };
}

pub mod memory;
pub mod task;
pub mod user;

pub use memory::InMemoryStore;
pub use task::PgTaskRepository;
pub use user::PgUserRepository;

/// Task persistence operations
///
/// All operations only see active tasks.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns every active task (empty when there are none)
    async fn get_all(&self) -> RepoResult<Vec<Task>>;

    /// Returns the active task with `id`, or `NotFound`
    async fn get_by_id(&self, id: Uuid) -> RepoResult<Task>;

    /// Returns the active tasks owned by `owner_id`
    ///
    /// Does not check that the owner exists.
    async fn get_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Task>>;

    /// Inserts a fully populated task and returns it
    async fn create(&self, task: Task) -> RepoResult<Task>;

    /// Saves a complete task record by identity and returns the stored row
    ///
    /// Callers merge partial changes before calling. An unknown ID is
    /// inserted; a soft-deleted one is left unchanged and reported as
    /// `NotFound`.
    async fn update(&self, task: Task) -> RepoResult<Task>;

    /// Soft-deletes the active task with `id`
    ///
    /// Fails with `NotFound` when no active row was affected, so deleting an
    /// already deleted task is reported rather than silently accepted.
    async fn delete(&self, id: Uuid) -> RepoResult<()>;
}

/// User persistence operations
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Returns true when any user row (deleted or not) has this email
    async fn email_exists(&self, email: &str) -> RepoResult<bool>;

    /// Inserts a user, failing with `EmailExists` on a duplicate email
    async fn create(&self, user: NewUser) -> RepoResult<User>;

    /// Returns the active user with `id`, or `NotFound`
    async fn get_by_id(&self, id: Uuid) -> RepoResult<User>;

    /// Returns every active user
    async fn get_all(&self) -> RepoResult<Vec<User>>;

    /// Saves a complete user record and returns the stored row
    async fn update(&self, user: User) -> RepoResult<User>;

    /// Permanently removes the user with `id`, or fails with `NotFound`
    async fn delete(&self, id: Uuid) -> RepoResult<()>;

    /// Returns the active tasks owned by `owner_id`
    ///
    /// Does not check that the owner exists.
    async fn get_tasks_for_user(&self, owner_id: Uuid) -> RepoResult<Vec<Task>>;

    /// Returns the user with its active tasks attached, or `NotFound`
    async fn get_user_with_tasks(&self, owner_id: Uuid) -> RepoResult<User>;
}

/// Fetches the active tasks owned by `owner_id` through any executor
///
/// Shared by both repositories so the owner filter exists once.
pub(crate) async fn fetch_tasks_by_owner<'e, E>(
    executor: E,
    owner_id: Uuid,
) -> Result<Vec<Task>, sqlx::Error>
where
    E: sqlx::PgExecutor<'e>,
{
    sqlx::query_as::<_, Task>(concat!(
        "SELECT ",
        task_columns!(),
        " FROM tasks WHERE owner_id = $1 AND ",
        active_rows!()
    ))
    .bind(owner_id)
    .fetch_all(executor)
    .await
}
