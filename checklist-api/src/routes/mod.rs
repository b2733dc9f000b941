/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `users`: User registration
/// - `todos`: Todo listing, creation, replacement, completion and deletion

pub mod health;
pub mod todos;
pub mod users;
