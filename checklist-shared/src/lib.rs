//! # Checklist Shared Library
//!
//! This crate contains the domain types and the in-memory store used by the
//! checklist API server.
//!
//! ## Module Organization
//!
//! - `id`: Identifier generation for users and todos
//! - `models`: Users, todos and the per-user todo list
//! - `store`: Thread-safe in-memory store keyed by username

pub mod id;
pub mod models;
pub mod store;

/// Current version of the checklist shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
