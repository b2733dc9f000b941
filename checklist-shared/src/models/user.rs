/// User model
///
/// A user is identified by a client-chosen `username` and owns a
/// [`TodoList`]. The username is the lookup key for every todo operation;
/// the server-generated `id` is informational.
///
/// # Wire Format
///
/// ```json
/// {
///   "id": "1f0c9c9e-4f0e-4a51-9a55-0c2f8b7f6c11",
///   "name": "Ann",
///   "username": "ann",
///   "todos": []
/// }
/// ```
///
/// # Example
///
/// ```
/// use checklist_shared::models::user::{CreateUser, User};
///
/// let user = User::new(CreateUser {
///     username: "ann".to_string(),
///     name: "Ann".to_string(),
/// });
/// assert_eq!(user.username, "ann");
/// assert!(user.todos.is_empty());
/// ```

use serde::{Deserialize, Serialize};

use super::todo::TodoList;
use crate::id;

/// A registered user and the todos they own
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Server-generated identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Unique lookup key, chosen by the client
    pub username: String,

    /// Owned todos, serialized as an array
    pub todos: TodoList,
}

/// Input for registering a user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub name: String,
}

impl User {
    /// Builds a new user with a fresh id and no todos
    pub fn new(data: CreateUser) -> Self {
        Self {
            id: id::generate(),
            name: data.name,
            username: data.username,
            todos: TodoList::new(),
        }
    }
}
