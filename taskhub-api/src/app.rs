/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use taskhub_api::{app::AppState, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = taskhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use taskhub_shared::repository::{InMemoryStore, PgTaskRepository, PgUserRepository};
use taskhub_shared::service::{TaskService, TaskServiceImpl, UserService, UserServiceImpl};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Task operations
    pub tasks: Arc<dyn TaskService>,

    /// User operations
    pub users: Arc<dyn UserService>,

    /// Database pool, absent when running over the in-memory store
    pub db: Option<PgPool>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates state backed by PostgreSQL repositories sharing one pool
    pub fn new(db: PgPool, config: Config) -> Self {
        let tasks = TaskServiceImpl::new(Arc::new(PgTaskRepository::new(db.clone())));
        let users = UserServiceImpl::new(Arc::new(PgUserRepository::new(db.clone())));

        Self {
            tasks: Arc::new(tasks),
            users: Arc::new(users),
            db: Some(db),
            config: Arc::new(config),
        }
    }

    /// Creates state backed by one in-memory store
    pub fn in_memory(store: Arc<InMemoryStore>, config: Config) -> Self {
        Self {
            tasks: Arc::new(TaskServiceImpl::new(store.clone())),
            users: Arc::new(UserServiceImpl::new(store)),
            db: None,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health
/// ├── /tasks
/// │   ├── GET    /              # All tasks, or ?owner_id= for one owner
/// │   ├── POST   /
/// │   ├── GET    /:id
/// │   ├── PATCH  /:id
/// │   └── DELETE /:id           # Soft delete
/// └── /users
///     ├── GET    /
///     ├── POST   /
///     ├── GET    /:id           # User with active tasks
///     ├── PATCH  /:id
///     ├── DELETE /:id
///     └── GET    /:id/tasks
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .patch(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let user_routes = Router::new()
        .route(
            "/",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route(
            "/:id",
            get(routes::users::get_user)
                .patch(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/:id/tasks", get(routes::users::list_user_tasks));

    let cors = build_cors(&state.config);

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/tasks", task_routes)
        .nest("/users", user_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

fn build_cors(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(std::time::Duration::from_secs(3600))
}
