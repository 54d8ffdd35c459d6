//! Error taxonomy for the data-access and service layers
//!
//! Two layers of errors exist:
//!
//! - [`RepoError`] is produced by repositories. It classifies every failure as
//!   a missing record, a duplicate email, or an opaque store failure.
//! - [`ServiceError`] is produced by services. It wraps a [`RepoError`] with
//!   the operation that failed, while keeping the original classification
//!   reachable through [`ServiceError::kind`].
//!
//! Callers are expected to branch on [`ErrorKind`], never on message text.
//!
//! # Example
//!
//! ```
//! use taskhub_shared::error::{Entity, ErrorKind, RepoError, ResultExt, ServiceResult};
//! use uuid::Uuid;
//!
//! fn lookup(id: Uuid) -> ServiceResult<()> {
//!     Err::<(), _>(RepoError::not_found(Entity::Task, id)).context(format!("get task {id}"))
//! }
//!
//! let err = lookup(Uuid::new_v4()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NotFound);
//! ```

use std::fmt;

use uuid::Uuid;

/// Entity a repository error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    /// A task row
    Task,

    /// A user row
    User,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Task => write!(f, "task"),
            Entity::User => write!(f, "user"),
        }
    }
}

/// Coarse classification shared by repository and service errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested record does not exist among active records
    NotFound,

    /// A user with the same email already exists
    EmailExists,

    /// Any other driver or I/O failure
    Store,
}

/// Repository error type
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No active record matched the identifier
    #[error("{entity} {id} not found")]
    NotFound {
        /// Which table was queried
        entity: Entity,

        /// Identifier that did not match
        id: Uuid,
    },

    /// Email is already taken by another user
    #[error("email already exists: {email}")]
    EmailExists {
        /// The conflicting email
        email: String,
    },

    /// Underlying database failure
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl RepoError {
    /// Builds a `NotFound` error
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        RepoError::NotFound { entity, id }
    }

    /// Builds an `EmailExists` error
    pub fn email_exists(email: impl Into<String>) -> Self {
        RepoError::EmailExists {
            email: email.into(),
        }
    }

    /// Classifies this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepoError::NotFound { .. } => ErrorKind::NotFound,
            RepoError::EmailExists { .. } => ErrorKind::EmailExists,
            RepoError::Store(_) => ErrorKind::Store,
        }
    }
}

/// Repository result type alias
pub type RepoResult<T> = Result<T, RepoError>;

/// Service error: a repository error annotated with the failing operation
///
/// The `Display` output is `"<context>: <source>"`, e.g.
/// `"delete task 4f1c…: task 4f1c… not found"`.
#[derive(Debug, thiserror::Error)]
#[error("{context}: {source}")]
pub struct ServiceError {
    context: String,
    #[source]
    source: RepoError,
}

impl ServiceError {
    /// Wraps a repository error with operation context
    pub fn new(context: impl Into<String>, source: RepoError) -> Self {
        Self {
            context: context.into(),
            source,
        }
    }

    /// Classification of the wrapped repository error
    pub fn kind(&self) -> ErrorKind {
        self.source.kind()
    }

    /// Operation that failed
    pub fn context(&self) -> &str {
        &self.context
    }

    /// The wrapped repository error
    pub fn repo_error(&self) -> &RepoError {
        &self.source
    }

    /// Shorthand for `kind() == ErrorKind::NotFound`
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Shorthand for `kind() == ErrorKind::EmailExists`
    pub fn is_email_exists(&self) -> bool {
        self.kind() == ErrorKind::EmailExists
    }
}

/// Service result type alias
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Attaches operation context to repository results
pub trait ResultExt<T> {
    /// Converts a `RepoResult` into a `ServiceResult` with the given context
    fn context(self, context: impl Into<String>) -> ServiceResult<T>;
}

impl<T> ResultExt<T> for RepoResult<T> {
    fn context(self, context: impl Into<String>) -> ServiceResult<T> {
        self.map_err(|source| ServiceError::new(context, source))
    }
}
