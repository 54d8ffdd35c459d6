/// Task endpoints
///
/// # Endpoints
///
/// - `GET /tasks` - List active tasks (optionally `?owner_id=` for one owner)
/// - `POST /tasks` - Create a task
/// - `GET /tasks/:id` - Get one active task
/// - `PATCH /tasks/:id` - Partially update a task
/// - `DELETE /tasks/:id` - Soft-delete a task

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use taskhub_shared::models::task::{Task, TaskPatch};
use uuid::Uuid;
use validator::Validate;

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListTasksQuery {
    /// Restrict the list to one owner
    #[serde(alias = "user_id")]
    pub owner_id: Option<Uuid>,
}

/// Create task request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    /// Task name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: String,

    /// Completion flag (default: false)
    #[serde(default)]
    pub is_done: bool,

    /// Owning user
    #[serde(alias = "user_id")]
    pub owner_id: Uuid,
}

/// Partial task update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PatchTaskRequest {
    /// New name
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,

    /// New completion flag
    pub is_done: Option<bool>,

    /// New owner
    #[serde(alias = "user_id")]
    pub owner_id: Option<Uuid>,
}

impl From<PatchTaskRequest> for TaskPatch {
    fn from(req: PatchTaskRequest) -> Self {
        TaskPatch {
            name: req.name,
            is_done: req.is_done,
            owner_id: req.owner_id,
        }
    }
}

/// List active tasks
///
/// # Endpoint
///
/// ```text
/// GET /tasks
/// GET /tasks?owner_id=<uuid>
/// ```
pub async fn list_tasks(
    State(state): State<AppState>,
    query: Result<Query<ListTasksQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Query(query) = query?;

    let tasks = match query.owner_id {
        Some(owner_id) => state.tasks.get_tasks_by_user_id(owner_id).await?,
        None => state.tasks.get_all_tasks().await?,
    };

    Ok(Json(tasks))
}

/// Create a task
///
/// # Endpoint
///
/// ```text
/// POST /tasks
/// Content-Type: application/json
///
/// {
///   "name": "write report",
///   "is_done": false,
///   "owner_id": "uuid"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `422 Unprocessable Entity`: Empty name
/// - `500 Internal Server Error`: Store failure
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Json(req) = payload?;
    req.validate()?;

    let task = state
        .tasks
        .create_task(req.name, req.is_done, req.owner_id)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Get one active task
pub async fn get_task(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    Ok(Json(state.tasks.get_task_by_id(id).await?))
}

/// Partially update a task
///
/// # Errors
///
/// - `404 Not Found`: Unknown or deleted task
/// - `422 Unprocessable Entity`: Empty name
pub async fn update_task(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<PatchTaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    req.validate()?;

    Ok(Json(state.tasks.update_task(id, req.into()).await?))
}

/// Soft-delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.tasks.delete_task(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_request_defaults_is_done() {
        let owner = Uuid::new_v4();
        let req: CreateTaskRequest =
            serde_json::from_value(serde_json::json!({ "name": "t", "owner_id": owner }))
                .unwrap();

        assert!(!req.is_done);
        assert_eq!(req.owner_id, owner);
    }

    #[test]
    fn test_create_request_accepts_user_id_alias() {
        let owner = Uuid::new_v4();
        let req: CreateTaskRequest = serde_json::from_value(
            serde_json::json!({ "name": "t", "is_done": true, "user_id": owner }),
        )
        .unwrap();

        assert_eq!(req.owner_id, owner);
        assert!(req.is_done);
    }

    #[test]
    fn test_empty_name_fails_validation() {
        let req = CreateTaskRequest {
            name: String::new(),
            is_done: false,
            owner_id: Uuid::new_v4(),
        };
        assert!(req.validate().is_err());

        let patch = PatchTaskRequest {
            name: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
        assert!(PatchTaskRequest::default().validate().is_ok());
    }

    #[test]
    fn test_patch_request_into_task_patch() {
        let patch: TaskPatch = PatchTaskRequest {
            is_done: Some(true),
            ..Default::default()
        }
        .into();

        assert_eq!(patch.is_done, Some(true));
        assert!(patch.name.is_none());
        assert!(patch.owner_id.is_none());
    }
}
