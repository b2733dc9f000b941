/// In-memory user and todo store
///
/// The store owns every user (and, through them, every todo) for the
/// lifetime of the process. Nothing is persisted.
///
/// # Concurrency
///
/// A single `RwLock` guards the username map. Lookups take the read lock;
/// every mutation takes the write lock and performs the whole
/// load → modify copy → store back sequence while holding it. The lock is
/// never held across an `.await`.
///
/// `Store` is a cheap handle (`Arc` inside): clone it into application
/// state and every clone sees the same data.
///
/// # Example
///
/// ```
/// use checklist_shared::models::todo::CreateTodo;
/// use checklist_shared::models::user::CreateUser;
/// use checklist_shared::store::Store;
///
/// # fn example() -> Result<(), checklist_shared::store::StoreError> {
/// let store = Store::new();
/// store.create_user(CreateUser {
///     username: "ann".to_string(),
///     name: "Ann".to_string(),
/// })?;
///
/// let todo = store.create_todo("ann", CreateTodo {
///     title: "Buy milk".to_string(),
///     deadline: serde_json::json!("2024-01-01"),
/// })?;
///
/// store.mark_todo_done("ann", &todo.id)?;
/// assert!(store.list_todos("ann")?[0].done);
/// # Ok(())
/// # }
/// ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use crate::models::todo::{CreateTodo, ReplaceTodo, Todo};
use crate::models::user::{CreateUser, User};

/// Error type for store operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Username is already registered
    #[error("User already exists: {username}")]
    UserAlreadyExists { username: String },

    /// No user with this username
    #[error("User not found: {username}")]
    UserNotFound { username: String },

    /// The user has no todo with this id
    #[error("Todo {id} not found for user {username}")]
    TodoNotFound { username: String, id: String },

    /// A thread panicked while holding the store lock
    #[error("Store lock poisoned")]
    LockPoisoned,
}

/// Store result type alias
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared handle to the in-memory store
#[derive(Debug, Clone, Default)]
pub struct Store {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl Store {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, User>>> {
        self.users.read().map_err(|_| {
            tracing::error!("store lock poisoned (read)");
            StoreError::LockPoisoned
        })
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, User>>> {
        self.users.write().map_err(|_| {
            tracing::error!("store lock poisoned (write)");
            StoreError::LockPoisoned
        })
    }

    /// Number of registered users
    pub fn user_count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }

    /// Registers a new user
    ///
    /// # Errors
    ///
    /// - `UserAlreadyExists` if the username is taken; the existing record
    ///   is left untouched
    /// - `LockPoisoned` if the store lock is poisoned
    pub fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut users = self.write()?;

        if users.contains_key(&data.username) {
            return Err(StoreError::UserAlreadyExists {
                username: data.username,
            });
        }

        let user = User::new(data);
        users.insert(user.username.clone(), user.clone());

        Ok(user)
    }

    /// Returns a snapshot of the user, including their todos
    ///
    /// # Errors
    ///
    /// - `UserNotFound` if no user has this username
    /// - `LockPoisoned` if the store lock is poisoned
    pub fn find_user(&self, username: &str) -> StoreResult<User> {
        self.read()?
            .get(username)
            .cloned()
            .ok_or_else(|| user_not_found(username))
    }

    /// Lists a user's todos in insertion order
    pub fn list_todos(&self, username: &str) -> StoreResult<Vec<Todo>> {
        let users = self.read()?;
        let user = users.get(username).ok_or_else(|| user_not_found(username))?;
        Ok(user.todos.to_vec())
    }

    /// Returns one of a user's todos
    pub fn find_todo(&self, username: &str, id: &str) -> StoreResult<Todo> {
        let users = self.read()?;
        let user = users.get(username).ok_or_else(|| user_not_found(username))?;
        user.todos
            .get(id)
            .cloned()
            .ok_or_else(|| todo_not_found(username, id))
    }

    /// Creates a todo for a user
    pub fn create_todo(&self, username: &str, data: CreateTodo) -> StoreResult<Todo> {
        let mut users = self.write()?;
        let user = users
            .get_mut(username)
            .ok_or_else(|| user_not_found(username))?;

        let todo = Todo::new(data);
        user.todos.insert(todo.clone());

        Ok(todo)
    }

    /// Replaces the title and deadline of a todo
    ///
    /// # Errors
    ///
    /// - `UserNotFound` / `TodoNotFound` if either lookup misses
    /// - `LockPoisoned` if the store lock is poisoned
    pub fn replace_todo(
        &self,
        username: &str,
        id: &str,
        data: ReplaceTodo,
    ) -> StoreResult<Todo> {
        self.update_todo(username, id, |todo| todo.replace(data))
    }

    /// Marks a todo as done. Idempotent.
    pub fn mark_todo_done(&self, username: &str, id: &str) -> StoreResult<Todo> {
        self.update_todo(username, id, Todo::mark_done)
    }

    /// Removes a todo from its owner
    pub fn delete_todo(&self, username: &str, id: &str) -> StoreResult<()> {
        let mut users = self.write()?;
        let user = users
            .get_mut(username)
            .ok_or_else(|| user_not_found(username))?;

        user.todos
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| todo_not_found(username, id))
    }

    /// Poisons the store lock by panicking on another thread while it holds
    /// the write guard. Every later operation fails with `LockPoisoned`.
    #[cfg(any(test, feature = "test-util"))]
    pub fn poison(&self) {
        let users = Arc::clone(&self.users);
        let result = std::thread::spawn(move || {
            let _guard = users.write();
            panic!("store lock poisoned on purpose");
        })
        .join();
        debug_assert!(result.is_err());
    }

    /// Loads a copy of the todo, applies `change`, and stores it back
    fn update_todo<F>(&self, username: &str, id: &str, change: F) -> StoreResult<Todo>
    where
        F: FnOnce(&mut Todo),
    {
        let mut users = self.write()?;
        let user = users
            .get_mut(username)
            .ok_or_else(|| user_not_found(username))?;

        let mut todo = user
            .todos
            .get(id)
            .cloned()
            .ok_or_else(|| todo_not_found(username, id))?;

        change(&mut todo);
        user.todos.insert(todo.clone());

        Ok(todo)
    }
}

fn user_not_found(username: &str) -> StoreError {
    StoreError::UserNotFound {
        username: username.to_string(),
    }
}

fn todo_not_found(username: &str, id: &str) -> StoreError {
    StoreError::TodoNotFound {
        username: username.to_string(),
        id: id.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ann() -> CreateUser {
        CreateUser {
            username: "ann".to_string(),
            name: "Ann".to_string(),
        }
    }

    fn buy_milk() -> CreateTodo {
        CreateTodo {
            title: "Buy milk".to_string(),
            deadline: json!("2024-01-01"),
        }
    }

    fn store_with_ann() -> Store {
        let store = Store::new();
        store.create_user(ann()).unwrap();
        store
    }

    #[test]
    fn test_create_and_find_user() {
        let store = Store::new();
        let created = store.create_user(ann()).unwrap();

        let found = store.find_user("ann").unwrap();
        assert_eq!(found, created);
        assert!(found.todos.is_empty());
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_username_rejected_without_mutation() {
        let store = store_with_ann();
        store.create_todo("ann", buy_milk()).unwrap();
        let before = store.find_user("ann").unwrap();

        let err = store
            .create_user(CreateUser {
                username: "ann".to_string(),
                name: "Someone Else".to_string(),
            })
            .unwrap_err();

        assert_eq!(
            err,
            StoreError::UserAlreadyExists {
                username: "ann".to_string()
            }
        );
        assert_eq!(store.find_user("ann").unwrap(), before);
        assert_eq!(store.user_count().unwrap(), 1);
    }

    #[test]
    fn test_find_unknown_user() {
        let store = Store::new();
        assert!(matches!(
            store.find_user("nobody"),
            Err(StoreError::UserNotFound { .. })
        ));
        assert!(matches!(
            store.list_todos("nobody"),
            Err(StoreError::UserNotFound { .. })
        ));
        assert!(matches!(
            store.create_todo("nobody", buy_milk()),
            Err(StoreError::UserNotFound { .. })
        ));
    }

    #[test]
    fn test_create_todo_defaults() {
        let store = store_with_ann();
        let todo = store.create_todo("ann", buy_milk()).unwrap();

        assert!(!todo.done);
        assert_eq!(store.find_todo("ann", &todo.id).unwrap(), todo);
        assert_eq!(store.list_todos("ann").unwrap(), vec![todo]);
    }

    #[test]
    fn test_clones_share_state() {
        let store = store_with_ann();
        let handle = store.clone();
        handle.create_todo("ann", buy_milk()).unwrap();
        assert_eq!(store.list_todos("ann").unwrap().len(), 1);
    }

    #[test]
    fn test_todos_scoped_to_owner() {
        let store = store_with_ann();
        store
            .create_user(CreateUser {
                username: "bob".to_string(),
                name: "Bob".to_string(),
            })
            .unwrap();

        let todo = store.create_todo("ann", buy_milk()).unwrap();

        assert!(store.list_todos("bob").unwrap().is_empty());
        assert!(matches!(
            store.mark_todo_done("bob", &todo.id),
            Err(StoreError::TodoNotFound { .. })
        ));
        assert!(!store.find_todo("ann", &todo.id).unwrap().done);
    }

    #[test]
    fn test_replace_todo_keeps_done_and_created_at() {
        let store = store_with_ann();
        let todo = store.create_todo("ann", buy_milk()).unwrap();
        store.mark_todo_done("ann", &todo.id).unwrap();

        let replaced = store
            .replace_todo(
                "ann",
                &todo.id,
                ReplaceTodo {
                    title: "Buy bread".to_string(),
                    deadline: json!("2024-02-01"),
                },
            )
            .unwrap();

        assert_eq!(replaced.title, "Buy bread");
        assert_eq!(replaced.deadline, "2024-02-01");
        assert!(replaced.done);
        assert_eq!(replaced.created_at, todo.created_at);
        assert_eq!(store.find_todo("ann", &todo.id).unwrap(), replaced);
    }

    #[test]
    fn test_mark_done_idempotent() {
        let store = store_with_ann();
        let todo = store.create_todo("ann", buy_milk()).unwrap();

        let first = store.mark_todo_done("ann", &todo.id).unwrap();
        let second = store.mark_todo_done("ann", &todo.id).unwrap();

        assert!(first.done);
        assert_eq!(first, second);
    }

    #[test]
    fn test_deleted_todo_is_gone() {
        let store = store_with_ann();
        let todo = store.create_todo("ann", buy_milk()).unwrap();

        store.delete_todo("ann", &todo.id).unwrap();
        assert!(store.list_todos("ann").unwrap().is_empty());

        let replace = ReplaceTodo {
            title: "x".to_string(),
            deadline: json!("y"),
        };
        let expected = StoreError::TodoNotFound {
            username: "ann".to_string(),
            id: todo.id.clone(),
        };
        assert_eq!(
            store.replace_todo("ann", &todo.id, replace).unwrap_err(),
            expected
        );
        assert_eq!(store.mark_todo_done("ann", &todo.id).unwrap_err(), expected);
        assert_eq!(store.delete_todo("ann", &todo.id).unwrap_err(), expected);
    }

    #[test]
    fn test_list_in_insertion_order() {
        let store = store_with_ann();
        let ids: Vec<String> = (0..5)
            .map(|i| {
                store
                    .create_todo(
                        "ann",
                        CreateTodo {
                            title: format!("todo {i}"),
                            deadline: json!("soon"),
                        },
                    )
                    .unwrap()
                    .id
            })
            .collect();

        store.delete_todo("ann", &ids[2]).unwrap();
        store.mark_todo_done("ann", &ids[0]).unwrap();

        let listed: Vec<String> = store
            .list_todos("ann")
            .unwrap()
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(listed, vec![ids[0].clone(), ids[1].clone(), ids[3].clone(), ids[4].clone()]);
    }

    #[test]
    fn test_concurrent_creates() {
        let store = store_with_ann();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        store.create_todo("ann", buy_milk()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.list_todos("ann").unwrap().len(), 200);
    }

    #[test]
    fn test_poisoned_lock_fails_every_operation() {
        let store = store_with_ann();
        let todo = store.create_todo("ann", buy_milk()).unwrap();

        store.poison();

        assert_eq!(store.user_count(), Err(StoreError::LockPoisoned));
        assert_eq!(
            store.create_user(CreateUser {
                username: "bob".to_string(),
                name: "Bob".to_string(),
            }),
            Err(StoreError::LockPoisoned)
        );
        assert_eq!(store.find_user("ann"), Err(StoreError::LockPoisoned));
        assert_eq!(store.list_todos("ann"), Err(StoreError::LockPoisoned));
        assert_eq!(
            store.mark_todo_done("ann", &todo.id),
            Err(StoreError::LockPoisoned)
        );
        assert_eq!(
            store.delete_todo("ann", &todo.id),
            Err(StoreError::LockPoisoned)
        );
    }

    #[test]
    fn test_error_display() {
        let err = StoreError::TodoNotFound {
            username: "ann".to_string(),
            id: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "Todo abc not found for user ann");
        assert_eq!(StoreError::LockPoisoned.to_string(), "Store lock poisoned");
    }
}
