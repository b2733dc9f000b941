/// Domain models for checklist
///
/// # Models
///
/// - `user`: Registered users, keyed by username
/// - `todo`: To-do items and the per-user `TodoList` that owns them
///
/// # Example
///
/// ```
/// use checklist_shared::models::todo::{CreateTodo, Todo};
/// use checklist_shared::models::user::{CreateUser, User};
///
/// let mut user = User::new(CreateUser {
///     username: "ann".to_string(),
///     name: "Ann".to_string(),
/// });
///
/// user.todos.insert(Todo::new(CreateTodo {
///     title: "Buy milk".to_string(),
///     deadline: serde_json::json!("2024-01-01"),
/// }));
/// assert_eq!(user.todos.len(), 1);
/// ```

pub mod todo;
pub mod user;
