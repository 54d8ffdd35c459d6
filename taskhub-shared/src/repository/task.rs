//! PostgreSQL task repository
//!
//! # Example
//!
//! ```no_run
//! use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
//! use taskhub_shared::models::task::Task;
//! use taskhub_shared::repository::{PgTaskRepository, TaskRepository};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig::default()).await?;
//! let repo = PgTaskRepository::new(pool);
//!
//! let task = repo.create(Task::new("write report", false, Uuid::new_v4())).await?;
//! repo.delete(task.id).await?;
//! assert!(repo.get_by_id(task.id).await.is_err());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{fetch_tasks_by_owner, TaskRepository};
use crate::error::{Entity, RepoError, RepoResult};
use crate::models::task::Task;

/// Task repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgTaskRepository {
    pool: PgPool,
}

impl PgTaskRepository {
    /// Creates a repository over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TaskRepository for PgTaskRepository {
    async fn get_all(&self) -> RepoResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE ",
            active_rows!()
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = tasks.len(), "Fetched active tasks");
        Ok(tasks)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<Task> {
        sqlx::query_as::<_, Task>(concat!(
            "SELECT ",
            task_columns!(),
            " FROM tasks WHERE id = $1 AND ",
            active_rows!()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::not_found(Entity::Task, id))
    }

    async fn get_by_owner(&self, owner_id: Uuid) -> RepoResult<Vec<Task>> {
        let tasks = fetch_tasks_by_owner(&self.pool, owner_id).await?;

        debug!(%owner_id, count = tasks.len(), "Fetched tasks by owner");
        Ok(tasks)
    }

    async fn create(&self, task: Task) -> RepoResult<Task> {
        let created = sqlx::query_as::<_, Task>(concat!(
            "INSERT INTO tasks (id, name, is_done, owner_id, deleted_at) ",
            "VALUES ($1, $2, $3, $4, $5) ",
            "RETURNING ",
            task_columns!()
        ))
        .bind(task.id)
        .bind(&task.name)
        .bind(task.is_done)
        .bind(task.owner_id)
        .bind(task.state.deleted_at())
        .fetch_one(&self.pool)
        .await?;

        info!(task_id = %created.id, owner_id = %created.owner_id, "Task created");
        Ok(created)
    }

    async fn update(&self, task: Task) -> RepoResult<Task> {
        // Upsert by identity. A soft-deleted row is left untouched and
        // returns nothing, so a delete racing this write surfaces as NotFound.
        let saved = sqlx::query_as::<_, Task>(concat!(
            "INSERT INTO tasks (id, name, is_done, owner_id) ",
            "VALUES ($1, $2, $3, $4) ",
            "ON CONFLICT (id) DO UPDATE SET ",
            "name = EXCLUDED.name, is_done = EXCLUDED.is_done, owner_id = EXCLUDED.owner_id ",
            "WHERE tasks.",
            active_rows!(),
            " RETURNING ",
            task_columns!()
        ))
        .bind(task.id)
        .bind(&task.name)
        .bind(task.is_done)
        .bind(task.owner_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            warn!(task_id = %task.id, "Update matched a deleted task");
            RepoError::not_found(Entity::Task, task.id)
        })?;

        info!(task_id = %saved.id, "Task saved");
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(concat!(
            "UPDATE tasks SET deleted_at = NOW() WHERE id = $1 AND ",
            active_rows!()
        ))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(task_id = %id, "Delete matched no active task");
            return Err(RepoError::not_found(Entity::Task, id));
        }

        info!(task_id = %id, "Task soft-deleted");
        Ok(())
    }
}
