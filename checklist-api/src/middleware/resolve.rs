/// Request-context resolution for the todo routes
///
/// Two ordered stages run in front of the todo handlers:
///
/// 1. **Resolve-User** reads the `username` header and looks the user up.
///    Adds [`UserContext`] to the request extensions.
/// 2. **Resolve-Todo** reads the `:id` path segment and looks it up in the
///    resolved user's todos. Adds [`TodoContext`].
///
/// Either stage short-circuits with `404 {"error":"User not found"}`. The
/// same text is used when the todo is missing.
///
/// ```text
/// Start → UserResolved → TodoResolved → handler
///           ↘ 404          ↘ 404
/// ```
///
/// The stages are plain functions ([`resolve_user`], [`resolve_todo`])
/// returning `ApiResult`; the `*_layer` functions adapt them to
/// `axum::middleware::from_fn`.
///
/// # Example
///
/// ```no_run
/// use axum::{middleware, routing::get, Extension, Router};
/// use checklist_api::app::AppState;
/// use checklist_api::middleware::resolve::{resolve_user_layer, UserContext};
///
/// async fn whoami(Extension(ctx): Extension<UserContext>) -> String {
///     ctx.username
/// }
///
/// # fn example(state: AppState) -> Router {
/// Router::new()
///     .route("/whoami", get(whoami))
///     .route_layer(middleware::from_fn_with_state(state.clone(), resolve_user_layer))
///     .with_state(state)
/// # }
/// ```

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, NOT_FOUND_MESSAGE},
};
use axum::{
    extract::{Path, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use checklist_shared::{
    models::{todo::Todo, user::User},
    store::Store,
};

/// Header carrying the caller's username
pub const USERNAME_HEADER: &str = "username";

/// Resolved user, added to request extensions by [`resolve_user_layer`]
#[derive(Debug, Clone)]
pub struct UserContext {
    /// Username taken from the request header
    pub username: String,

    /// Snapshot of the user at resolution time
    pub user: User,
}

/// Resolved todo, added to request extensions by [`resolve_todo_layer`]
#[derive(Debug, Clone)]
pub struct TodoContext {
    /// Snapshot of the todo at resolution time (id included)
    pub todo: Todo,
}

/// Resolves the user named by the `username` header
///
/// A missing or non-UTF-8 header is treated as an unknown user.
pub fn resolve_user(store: &Store, headers: &HeaderMap) -> ApiResult<UserContext> {
    let Some(username) = headers.get(USERNAME_HEADER).and_then(|v| v.to_str().ok()) else {
        tracing::debug!("rejecting request without username header");
        return Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()));
    };

    let user = store.find_user(username).map_err(|err| {
        tracing::debug!(username, error = %err, "user resolution failed");
        ApiError::from(err)
    })?;

    Ok(UserContext {
        username: username.to_string(),
        user,
    })
}

/// Resolves todo `id` within an already-resolved user
pub fn resolve_todo(context: &UserContext, id: &str) -> ApiResult<TodoContext> {
    match context.user.todos.get(id) {
        Some(todo) => Ok(TodoContext { todo: todo.clone() }),
        None => {
            tracing::debug!(username = %context.username, todo_id = id, "todo resolution failed");
            Err(ApiError::NotFound(NOT_FOUND_MESSAGE.to_string()))
        }
    }
}

/// Resolve-User middleware
pub async fn resolve_user_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = resolve_user(&state.store, req.headers())?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}

/// Resolve-Todo middleware
///
/// Must run after [`resolve_user_layer`]; add both with `route_layer` so the
/// `:id` path parameter is available.
pub async fn resolve_todo_layer(
    Path(id): Path<String>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = req
        .extensions()
        .get::<UserContext>()
        .ok_or_else(|| ApiError::InternalError("todo resolved before user".to_string()))?;

    let todo = resolve_todo(context, &id)?;
    req.extensions_mut().insert(todo);

    Ok(next.run(req).await)
}
