/// User registration endpoint
///
/// # Endpoints
///
/// - `POST /users` - Register a username

use crate::{app::AppState, error::ApiResult};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use checklist_shared::models::user::{CreateUser, User};
use serde::Deserialize;
use validator::Validate;

/// Create user request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    /// Display name
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    /// Unique username, used as the `username` header afterwards
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
}

/// Register a user
///
/// # Endpoint
///
/// ```text
/// POST /users
/// Content-Type: application/json
///
/// { "name": "Ann", "username": "ann" }
/// ```
///
/// # Response
///
/// ```json
/// { "id": "uuid", "name": "Ann", "username": "ann", "todos": [] }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: `{"error":"User already exists"}`, or malformed body
/// - `422 Unprocessable Entity`: empty name or username
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> ApiResult<Json<User>> {
    let Json(req) = payload?;
    req.validate()?;

    let user = state.store.create_user(CreateUser {
        username: req.username,
        name: req.name,
    })?;

    tracing::info!(username = %user.username, user_id = %user.id, "user created");

    Ok(Json(user))
}
