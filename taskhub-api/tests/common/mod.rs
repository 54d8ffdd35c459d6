/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A router over a fresh in-memory store (no database needed)
/// - A JSON request helper
/// - User/task creation through the API

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use taskhub_api::app::{build_router, AppState};
use taskhub_api::config::{ApiConfig, Config, DatabaseConfig};
use taskhub_shared::repository::InMemoryStore;
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context with an empty store
    pub fn new() -> Self {
        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: String::new(),
                max_connections: 1,
                run_migrations: false,
            },
        };

        let store = Arc::new(InMemoryStore::new());
        let app = build_router(AppState::in_memory(store.clone(), config));

        TestContext { store, app }
    }

    /// Sends a request and returns the status with the parsed JSON body
    ///
    /// An empty body (e.g. 204) is returned as `Value::Null`.
    pub async fn send(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        self.send_request(builder.body(body).unwrap()).await
    }

    /// Sends a prepared request
    pub async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!(
                    "Expected JSON body, got {}: {}",
                    status,
                    String::from_utf8_lossy(&bytes)
                )
            })
        };

        (status, value)
    }

    /// Creates a user and returns its JSON representation
    pub async fn create_user(&self, email: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/users",
                Some(json!({ "email": email, "password": "p" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create user failed: {body}");
        body
    }

    /// Creates a task and returns its JSON representation
    pub async fn create_task(&self, name: &str, owner_id: &str) -> Value {
        let (status, body) = self
            .send(
                "POST",
                "/tasks",
                Some(json!({ "name": name, "owner_id": owner_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create task failed: {body}");
        body
    }
}

/// Extracts the `id` field of a JSON entity
pub fn id_of(value: &Value) -> String {
    value["id"].as_str().expect("entity has an id").to_string()
}
