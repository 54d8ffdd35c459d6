//! User service
//!
//! Owns the user lifecycle and the "user with tasks" composition. Requests for
//! a user's tasks first confirm the user exists, so an unknown user is reported
//! as `NotFound` instead of an empty list.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ResultExt, ServiceResult};
use crate::models::task::Task;
use crate::models::user::{NewUser, User, UserPatch};
use crate::repository::UserRepository;

/// User operations exposed to the API layer
#[async_trait]
pub trait UserService: Send + Sync {
    /// Returns every active user (without tasks)
    async fn get_all_users(&self) -> ServiceResult<Vec<User>>;

    /// Returns one active user (without tasks)
    async fn get_user_by_id(&self, id: Uuid) -> ServiceResult<User>;

    /// Creates a user with a freshly generated ID
    ///
    /// A duplicate email fails with kind `EmailExists` and nothing is stored.
    async fn create_user(&self, email: String, password: String) -> ServiceResult<User>;

    /// Applies a partial update to an active user
    async fn update_user(&self, id: Uuid, patch: UserPatch) -> ServiceResult<User>;

    /// Permanently removes a user
    async fn delete_user(&self, id: Uuid) -> ServiceResult<()>;

    /// Returns the active tasks of an existing user
    async fn get_tasks_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Task>>;

    /// Returns a user with its active tasks attached
    async fn get_user_with_tasks(&self, id: Uuid) -> ServiceResult<User>;
}

/// [`UserService`] over any [`UserRepository`]
pub struct UserServiceImpl<R: UserRepository> {
    repo: Arc<R>,
}

impl<R: UserRepository> UserServiceImpl<R> {
    /// Creates a service over the given repository
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R: UserRepository> UserService for UserServiceImpl<R> {
    async fn get_all_users(&self) -> ServiceResult<Vec<User>> {
        self.repo.get_all().await.context("get all users")
    }

    async fn get_user_by_id(&self, id: Uuid) -> ServiceResult<User> {
        self.repo
            .get_by_id(id)
            .await
            .context(format!("get user {id}"))
    }

    async fn create_user(&self, email: String, password: String) -> ServiceResult<User> {
        let new_user = NewUser::new(email, password);
        let id = new_user.id;

        let user = self
            .repo
            .create(new_user)
            .await
            .context(format!("create user {id}"))?;

        info!(user_id = %id, "Created user");
        Ok(user)
    }

    async fn update_user(&self, id: Uuid, patch: UserPatch) -> ServiceResult<User> {
        let context = format!("update user {id}");
        let mut user = self.repo.get_by_id(id).await.context(context.clone())?;

        patch.apply_to(&mut user);

        self.repo.update(user).await.context(context)
    }

    async fn delete_user(&self, id: Uuid) -> ServiceResult<()> {
        self.repo
            .delete(id)
            .await
            .context(format!("delete user {id}"))
    }

    async fn get_tasks_for_user(&self, user_id: Uuid) -> ServiceResult<Vec<Task>> {
        let context = format!("get tasks for user {user_id}");
        self.repo
            .get_by_id(user_id)
            .await
            .context(context.clone())?;

        self.repo
            .get_tasks_for_user(user_id)
            .await
            .context(context)
    }

    async fn get_user_with_tasks(&self, id: Uuid) -> ServiceResult<User> {
        let context = format!("get user {id} with tasks");

        // Two separate reads; a task may change between them.
        let user = self.repo.get_by_id(id).await.context(context.clone())?;
        let tasks = self
            .repo
            .get_tasks_for_user(id)
            .await
            .context(context)?;

        debug!(user_id = %id, count = tasks.len(), "Composed user with tasks");
        Ok(user.with_tasks(tasks))
    }
}
