//! Task service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ResultExt, ServiceResult};
use crate::models::task::{Task, TaskPatch};
use crate::repository::TaskRepository;

/// Task operations exposed to the API layer
#[async_trait]
pub trait TaskService: Send + Sync {
    /// Returns every active task
    async fn get_all_tasks(&self) -> ServiceResult<Vec<Task>>;

    /// Returns one active task, or a `NotFound` error
    async fn get_task_by_id(&self, id: Uuid) -> ServiceResult<Task>;

    /// Returns the active tasks owned by a user
    ///
    /// An unknown owner yields an empty list.
    async fn get_tasks_by_user_id(&self, owner_id: Uuid) -> ServiceResult<Vec<Task>>;

    /// Creates a task with a freshly generated ID
    async fn create_task(&self, name: String, is_done: bool, owner_id: Uuid)
        -> ServiceResult<Task>;

    /// Applies a partial update to an active task
    ///
    /// Loads the current record, merges the fields present in `patch`, and
    /// saves the result once. A missing task surfaces as `NotFound`.
    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> ServiceResult<Task>;

    /// Soft-deletes an active task
    async fn delete_task(&self, id: Uuid) -> ServiceResult<()>;
}

/// [`TaskService`] over any [`TaskRepository`]
pub struct TaskServiceImpl<R: TaskRepository> {
    repo: Arc<R>,
}

impl<R: TaskRepository> TaskServiceImpl<R> {
    /// Creates a service over the given repository
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: TaskRepository> TaskService for TaskServiceImpl<R> {
    async fn get_all_tasks(&self) -> ServiceResult<Vec<Task>> {
        self.repo.get_all().await.context("get all tasks")
    }

    async fn get_task_by_id(&self, id: Uuid) -> ServiceResult<Task> {
        self.repo
            .get_by_id(id)
            .await
            .context(format!("get task {id}"))
    }

    async fn get_tasks_by_user_id(&self, owner_id: Uuid) -> ServiceResult<Vec<Task>> {
        self.repo
            .get_by_owner(owner_id)
            .await
            .context(format!("get tasks for user {owner_id}"))
    }

    async fn create_task(
        &self,
        name: String,
        is_done: bool,
        owner_id: Uuid,
    ) -> ServiceResult<Task> {
        let task = Task::new(name, is_done, owner_id);
        let id = task.id;

        let created = self
            .repo
            .create(task)
            .await
            .context(format!("create task {id}"))?;

        info!(task_id = %id, %owner_id, "Created task");
        Ok(created)
    }

    async fn update_task(&self, id: Uuid, patch: TaskPatch) -> ServiceResult<Task> {
        let context = format!("update task {id}");
        let mut task = self.repo.get_by_id(id).await.context(context.clone())?;

        if patch.is_empty() {
            debug!(task_id = %id, "Empty patch, saving unchanged task");
        }
        patch.apply_to(&mut task);

        self.repo.update(task).await.context(context)
    }

    async fn delete_task(&self, id: Uuid) -> ServiceResult<()> {
        self.repo
            .delete(id)
            .await
            .context(format!("delete task {id}"))
    }
}
