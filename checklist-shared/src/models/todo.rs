/// Todo model
///
/// A todo belongs to exactly one user and lives inside that user's
/// [`TodoList`]. Only `title` and `deadline` can be replaced after creation;
/// `done` can move from `false` to `true` and never back.
///
/// # Wire Format
///
/// ```json
/// {
///   "id": "67e55044-10b1-426f-9247-bb680e5fe0c8",
///   "title": "Buy milk",
///   "deadline": "2024-01-01",
///   "done": false,
///   "created_at": "2024-01-01T09:30:00.000000Z"
/// }
/// ```
///
/// # Example
///
/// ```
/// use checklist_shared::models::todo::{CreateTodo, Todo};
/// use serde_json::json;
///
/// let mut todo = Todo::new(CreateTodo {
///     title: "Buy milk".to_string(),
///     deadline: json!("2024-01-01"),
/// });
/// assert!(!todo.done);
///
/// todo.mark_done();
/// assert!(todo.done);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

use crate::id;

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Server-generated identifier, unique within the owning user
    pub id: String,

    /// What needs doing
    pub title: String,

    /// Client-supplied deadline, kept verbatim
    ///
    /// Any JSON value is accepted: date strings, RFC 3339 timestamps, epoch
    /// milliseconds, objects or `null`. The service never interprets it.
    pub deadline: Value,

    /// Completion flag
    pub done: bool,

    /// When the todo was created (never changes afterwards)
    pub created_at: DateTime<Utc>,
}

/// Input for creating a todo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTodo {
    pub title: String,
    pub deadline: Value,
}

/// Input for replacing the mutable fields of a todo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceTodo {
    pub title: String,
    pub deadline: Value,
}

impl Todo {
    /// Creates a new, not-yet-done todo with a fresh id
    pub fn new(data: CreateTodo) -> Self {
        Self {
            id: id::generate(),
            title: data.title,
            deadline: data.deadline,
            done: false,
            created_at: Utc::now(),
        }
    }

    /// Overwrites title and deadline, leaving `done` and `created_at` alone
    pub fn replace(&mut self, data: ReplaceTodo) {
        self.title = data.title;
        self.deadline = data.deadline;
    }

    /// Marks the todo as done. Calling it again is a no-op.
    pub fn mark_done(&mut self) {
        self.done = true;
    }
}

/// The todos owned by one user, keyed by id
///
/// Iteration yields todos in insertion order. Replacing an existing entry
/// keeps its original position. Serializes as a JSON array, never as an
/// id-keyed object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    entries: HashMap<String, Todo>,
    order: Vec<String>,
}

impl TodoList {
    /// Creates an empty list
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a todo by id
    pub fn get(&self, id: &str) -> Option<&Todo> {
        self.entries.get(id)
    }

    /// Inserts a todo, or replaces the entry with the same id in place
    pub fn insert(&mut self, todo: Todo) {
        if !self.entries.contains_key(&todo.id) {
            self.order.push(todo.id.clone());
        }
        self.entries.insert(todo.id.clone(), todo);
    }

    /// Removes a todo, returning it if it was present
    pub fn remove(&mut self, id: &str) -> Option<Todo> {
        let removed = self.entries.remove(id)?;
        self.order.retain(|entry| entry != id);
        Some(removed)
    }

    /// Iterates todos in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Todo> {
        self.order.iter().filter_map(|id| self.entries.get(id))
    }

    /// Clones the todos into a vector, in insertion order
    pub fn to_vec(&self) -> Vec<Todo> {
        self.iter().cloned().collect()
    }
}

impl Serialize for TodoList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}
