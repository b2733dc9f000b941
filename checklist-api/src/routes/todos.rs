/// Todo endpoints
///
/// All endpoints require the `username` header (Resolve-User). Routes with
/// an `:id` segment also run Resolve-Todo before the handler.
///
/// # Endpoints
///
/// - `GET /todos` - List the caller's todos
/// - `POST /todos` - Create a todo
/// - `PUT /todos/:id` - Replace title and deadline
/// - `PATCH /todos/:id/done` - Mark as done
/// - `DELETE /todos/:id` - Delete

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::resolve::{TodoContext, UserContext},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use checklist_shared::models::todo::{CreateTodo, ReplaceTodo, Todo};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

/// Create or replace todo request
#[derive(Debug, Deserialize, Validate)]
pub struct TodoRequest {
    /// Todo title
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    /// Deadline, any JSON value, stored verbatim
    pub deadline: Value,
}

/// List todos
///
/// # Endpoint
///
/// ```text
/// GET /todos
/// username: ann
/// ```
///
/// # Response
///
/// ```json
/// [
///   {
///     "id": "uuid",
///     "title": "Buy milk",
///     "deadline": "2024-01-01",
///     "done": false,
///     "created_at": "2024-01-01T09:30:00Z"
///   }
/// ]
/// ```
pub async fn list_todos(Extension(ctx): Extension<UserContext>) -> Json<Vec<Todo>> {
    Json(ctx.user.todos.to_vec())
}

/// Create a todo
///
/// # Endpoint
///
/// ```text
/// POST /todos
/// username: ann
/// Content-Type: application/json
///
/// { "title": "Buy milk", "deadline": "2024-01-01" }
/// ```
///
/// # Response
///
/// `201 Created` with the new todo (`done: false`).
pub async fn create_todo(
    State(state): State<AppState>,
    Extension(ctx): Extension<UserContext>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Todo>)> {
    let Json(req) = payload?;
    req.validate()?;

    let todo = state.store.create_todo(
        &ctx.username,
        CreateTodo {
            title: req.title,
            deadline: req.deadline,
        },
    )?;

    tracing::info!(username = %ctx.username, todo_id = %todo.id, "todo created");

    Ok((StatusCode::CREATED, Json(todo)))
}

/// Replace a todo's title and deadline
///
/// # Endpoint
///
/// ```text
/// PUT /todos/:id
/// username: ann
/// Content-Type: application/json
///
/// { "title": "Buy oat milk", "deadline": "2024-01-02" }
/// ```
///
/// # Errors
///
/// - `404 Not Found`: unknown user or todo
pub async fn replace_todo(
    State(state): State<AppState>,
    Extension(ctx): Extension<UserContext>,
    Extension(resolved): Extension<TodoContext>,
    payload: Result<Json<TodoRequest>, JsonRejection>,
) -> ApiResult<Json<Todo>> {
    let Json(req) = payload?;
    req.validate()?;

    let todo = state.store.replace_todo(
        &ctx.username,
        &resolved.todo.id,
        ReplaceTodo {
            title: req.title,
            deadline: req.deadline,
        },
    )?;

    Ok(Json(todo))
}

/// Mark a todo as done
///
/// Idempotent: marking a done todo again returns it unchanged.
///
/// # Endpoint
///
/// ```text
/// PATCH /todos/:id/done
/// username: ann
/// ```
pub async fn mark_todo_done(
    State(state): State<AppState>,
    Extension(ctx): Extension<UserContext>,
    Extension(resolved): Extension<TodoContext>,
) -> ApiResult<Json<Todo>> {
    let todo = state.store.mark_todo_done(&ctx.username, &resolved.todo.id)?;
    Ok(Json(todo))
}

/// Delete a todo
///
/// # Endpoint
///
/// ```text
/// DELETE /todos/:id
/// username: ann
/// ```
///
/// # Response
///
/// `204 No Content`
pub async fn delete_todo(
    State(state): State<AppState>,
    Extension(ctx): Extension<UserContext>,
    Extension(resolved): Extension<TodoContext>,
) -> ApiResult<StatusCode> {
    state.store.delete_todo(&ctx.username, &resolved.todo.id)?;

    tracing::info!(username = %ctx.username, todo_id = %resolved.todo.id, "todo deleted");

    Ok(StatusCode::NO_CONTENT)
}
