/// User endpoints
///
/// # Endpoints
///
/// - `GET /users` - List active users
/// - `POST /users` - Create a user
/// - `GET /users/:id` - Get a user with its active tasks
/// - `PATCH /users/:id` - Partially update a user
/// - `DELETE /users/:id` - Delete a user
/// - `GET /users/:id/tasks` - List a user's active tasks
///
/// The password is stored as given and echoed back in every user response.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskhub_shared::models::task::Task;
use taskhub_shared::models::user::{User, UserPatch};
use uuid::Uuid;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Credential string
    pub password: String,
}

/// Partial user update; absent fields keep their stored value
#[derive(Debug, Default, Deserialize, Validate)]
pub struct PatchUserRequest {
    /// New email address
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    /// New credential string
    pub password: Option<String>,
}

impl From<PatchUserRequest> for UserPatch {
    fn from(req: PatchUserRequest) -> Self {
        UserPatch {
            email: req.email,
            password: req.password,
        }
    }
}

/// User as returned by the API
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    /// User ID
    pub id: Uuid,

    /// Email address
    pub email: String,

    /// Credential string, as stored
    pub password: String,

    /// Active tasks; only filled by `GET /users/:id`
    pub tasks: Vec<Task>,

    /// Creation time
    pub created_at: DateTime<Utc>,

    /// Last update time
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            password: user.password,
            tasks: user.tasks,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// List active users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.users.get_all_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// Create a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "secret"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Malformed body
/// - `409 Conflict`: Email already exists
/// - `422 Unprocessable Entity`: Invalid email
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.users.create_user(req.email, req.password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a user with its active tasks
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Path(id) = id?;
    let user = state.users.get_user_with_tasks(id).await?;
    Ok(Json(user.into()))
}

/// Partially update a user
///
/// # Errors
///
/// - `404 Not Found`: Unknown user
/// - `409 Conflict`: New email belongs to another user
/// - `422 Unprocessable Entity`: Invalid email
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<PatchUserRequest>, JsonRejection>,
) -> ApiResult<Json<UserResponse>> {
    let Path(id) = id?;
    let Json(req) = payload?;
    req.validate()?;

    let user = state.users.update_user(id, req.into()).await?;
    Ok(Json(user.into()))
}

/// Delete a user
///
/// Tasks owned by the user are left as they are.
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List a user's active tasks
///
/// An unknown user is a 404, not an empty list.
pub async fn list_user_tasks(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Path(id) = id?;
    Ok(Json(state.users.get_tasks_for_user(id).await?))
}
