//! PostgreSQL user repository
//!
//! Email uniqueness is guarded twice: `create` first asks [`email_exists`],
//! then inserts. The two calls are separate statements, so two concurrent
//! creates can both pass the check; the `users_email_key` unique constraint
//! catches the loser and its violation is reported as `EmailExists`.
//!
//! [`email_exists`]: UserRepository::email_exists

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{fetch_tasks_by_owner, UserRepository};
use crate::error::{Entity, RepoError, RepoResult};
use crate::models::task::Task;
use crate::models::user::{NewUser, User};

/// User repository backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    /// Creates a repository over the given pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps a unique violation on `users.email` to `EmailExists`
///
/// Every other error is passed through as a store error.
fn map_email_conflict(err: sqlx::Error, email: &str) -> RepoError {
    if let sqlx::Error::Database(db_err) = &err {
        let on_email = db_err
            .constraint()
            .map_or(true, |constraint| constraint.contains("email"));

        if db_err.is_unique_violation() && on_email {
            return RepoError::email_exists(email);
        }
    }

    RepoError::Store(err)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn email_exists(&self, email: &str) -> RepoResult<bool> {
        // Deliberately unfiltered: a soft-deleted user still holds its email,
        // matching the table-wide unique constraint.
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE email = $1")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(count > 0)
    }

    async fn create(&self, user: NewUser) -> RepoResult<User> {
        if self.email_exists(&user.email).await? {
            warn!(email = %user.email, "Rejected user with duplicate email");
            return Err(RepoError::email_exists(user.email));
        }

        let created = sqlx::query_as::<_, User>(concat!(
            "INSERT INTO users (id, email, password) ",
            "VALUES ($1, $2, $3) ",
            "RETURNING ",
            user_columns!()
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .map_err(|err| map_email_conflict(err, &user.email))?;

        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    async fn get_by_id(&self, id: Uuid) -> RepoResult<User> {
        sqlx::query_as::<_, User>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = $1 AND ",
            active_rows!()
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| RepoError::not_found(Entity::User, id))
    }

    async fn get_all(&self) -> RepoResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE ",
            active_rows!(),
            " ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = users.len(), "Fetched active users");
        Ok(users)
    }

    async fn update(&self, user: User) -> RepoResult<User> {
        let saved = sqlx::query_as::<_, User>(concat!(
            "UPDATE users SET email = $2, password = $3, updated_at = NOW() ",
            "WHERE id = $1 AND ",
            active_rows!(),
            " RETURNING ",
            user_columns!()
        ))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password)
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| map_email_conflict(err, &user.email))?
        .ok_or_else(|| RepoError::not_found(Entity::User, user.id))?;

        info!(user_id = %saved.id, "User saved");
        Ok(saved)
    }

    async fn delete(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(concat!(
            "DELETE FROM users WHERE id = $1 AND ",
            active_rows!()
        ))
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            warn!(user_id = %id, "Delete matched no user");
            return Err(RepoError::not_found(Entity::User, id));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    async fn get_tasks_for_user(&self, owner_id: Uuid) -> RepoResult<Vec<Task>> {
        let tasks = fetch_tasks_by_owner(&self.pool, owner_id).await?;

        debug!(%owner_id, count = tasks.len(), "Fetched tasks for user");
        Ok(tasks)
    }

    async fn get_user_with_tasks(&self, owner_id: Uuid) -> RepoResult<User> {
        // Both reads share one snapshot.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query_as::<_, User>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM users WHERE id = $1 AND ",
            active_rows!()
        ))
        .bind(owner_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| RepoError::not_found(Entity::User, owner_id))?;

        let tasks = fetch_tasks_by_owner(&mut *tx, owner_id).await?;
        tx.commit().await?;

        debug!(user_id = %owner_id, count = tasks.len(), "Fetched user with tasks");
        Ok(user.with_tasks(tasks))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::error::{DatabaseError, ErrorKind as DbErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    /// Database error carrying a fixed kind and constraint name
    #[derive(Debug)]
    struct FakeDbError {
        kind: DbErrorKind,
        constraint: Option<&'static str>,
    }

    impl fmt::Display for FakeDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("duplicate key value violates unique constraint")
        }
    }

    impl StdError for FakeDbError {}

    impl DatabaseError for FakeDbError {
        fn message(&self) -> &str {
            "duplicate key value violates unique constraint"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            Some(Cow::Borrowed("23505"))
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            self.constraint
        }

        fn kind(&self) -> DbErrorKind {
            match self.kind {
                DbErrorKind::UniqueViolation => DbErrorKind::UniqueViolation,
                _ => DbErrorKind::Other,
            }
        }
    }

    fn db_error(kind: DbErrorKind, constraint: Option<&'static str>) -> sqlx::Error {
        sqlx::Error::Database(Box::new(FakeDbError { kind, constraint }))
    }

    #[test]
    fn test_email_unique_violation_is_email_exists() {
        let err = map_email_conflict(
            db_error(DbErrorKind::UniqueViolation, Some("users_email_key")),
            "a@x.com",
        );

        match err {
            RepoError::EmailExists { email } => assert_eq!(email, "a@x.com"),
            other => panic!("expected EmailExists, got {other:?}"),
        }
    }

    #[test]
    fn test_primary_key_violation_is_store_error() {
        let err = map_email_conflict(
            db_error(DbErrorKind::UniqueViolation, Some("users_pkey")),
            "a@x.com",
        );

        assert!(matches!(err, RepoError::Store(sqlx::Error::Database(_))));
    }

    #[test]
    fn test_other_constraint_kinds_are_store_errors() {
        let err = map_email_conflict(
            db_error(DbErrorKind::CheckViolation, Some("users_email_key")),
            "a@x.com",
        );
        assert!(matches!(err, RepoError::Store(_)));

        let err = map_email_conflict(sqlx::Error::RowNotFound, "a@x.com");
        assert!(matches!(err, RepoError::Store(sqlx::Error::RowNotFound)));
    }
}
