//! Database migration runner
//!
//! Migrations are embedded from this crate's `migrations/` directory at
//! compile time, one `{timestamp}_{name}.sql` file per step:
//!
//! - `users`, with the `users_email_key` unique constraint
//! - `tasks`, with indexes on `owner_id` and `deleted_at`
//!
//! # Example
//!
//! ```no_run
//! use taskhub_shared::db::migrations::{ensure_database_exists, run_migrations};
//! use taskhub_shared::db::pool::{create_pool, DatabaseConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let url = std::env::var("DATABASE_URL")?;
//!     ensure_database_exists(&url).await?;
//!
//!     let pool = create_pool(DatabaseConfig { url, ..Default::default() }).await?;
//!     run_migrations(&pool).await?;
//!     Ok(())
//! }
//! ```

use sqlx::{migrate::MigrateDatabase, postgres::PgPool, Postgres};
use tracing::{debug, info, warn};

/// Runs all pending database migrations
///
/// Each migration runs in its own transaction; a failing step is rolled back
/// and reported.
///
/// # Errors
///
/// Returns an error if a migration fails to apply, or if an applied
/// migration no longer matches its embedded checksum
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates the database if it doesn't exist
///
/// # Errors
///
/// Returns an error if the server is unreachable or the role lacks
/// permission to create databases
pub async fn ensure_database_exists(database_url: &str) -> Result<(), sqlx::Error> {
    info!("Checking if database exists");

    if !Postgres::database_exists(database_url).await? {
        info!("Database does not exist, creating it");
        Postgres::create_database(database_url).await?;
        info!("Database created successfully");
    } else {
        debug!("Database already exists");
    }

    Ok(())
}
