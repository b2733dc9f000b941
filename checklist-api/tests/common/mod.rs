/// Common test utilities for integration tests
///
/// This module provides shared infrastructure for integration tests:
/// - A fresh router and store per test
/// - Request helpers that send JSON with an optional `username` header
/// - User/todo creation shortcuts

use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use checklist_api::app::{build_router, AppState};
use checklist_api::config::Config;
use checklist_shared::store::Store;
use serde_json::{json, Value};
use tower::Service as _;

/// Test context containing all necessary resources
pub struct TestContext {
    pub app: axum::Router,
    pub store: Store,
}

/// A buffered response
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl TestResponse {
    /// Parses the body as JSON, panicking with the raw body on failure
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Expected JSON body ({}), got {}: {:?}",
                e,
                self.status,
                String::from_utf8_lossy(&self.body)
            )
        })
    }
}

impl TestContext {
    /// Creates a new test context with an empty store
    pub fn new() -> Self {
        let store = Store::new();
        let state = AppState::with_store(store.clone(), Config::default());
        let app = build_router(state);

        TestContext { app, store }
    }

    /// Sends a request through the router
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        username: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(username) = username {
            builder = builder.header("username", username);
        }

        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .call(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        TestResponse { status, body }
    }

    /// Registers a user through the API and returns the response body
    pub async fn create_user(&self, name: &str, username: &str) -> Value {
        let response = self
            .send(
                "POST",
                "/users",
                None,
                Some(json!({ "name": name, "username": username })),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK);
        response.json()
    }

    /// Creates a todo through the API and returns the response body
    pub async fn create_todo(&self, username: &str, title: &str, deadline: &str) -> Value {
        let response = self
            .send(
                "POST",
                "/todos",
                Some(username),
                Some(json!({ "title": title, "deadline": deadline })),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
        response.json()
    }
}
