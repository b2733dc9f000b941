/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use checklist_api::{app::{build_router, AppState}, config::Config};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let state = AppState::new(config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:3333").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::{
    config::Config,
    middleware::resolve::{resolve_todo_layer, resolve_user_layer, USERNAME_HEADER},
    routes,
};
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use checklist_shared::store::Store;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Both fields are cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// In-memory user and todo store
    pub store: Store,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state with an empty store
    pub fn new(config: Config) -> Self {
        Self::with_store(Store::new(), config)
    }

    /// Creates application state around an existing store
    pub fn with_store(store: Store, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health             # Health check (no middleware)
/// ├── POST   /users              # Register (no middleware)
/// └── /todos                     # Resolve-User
///     ├── GET    /
///     ├── POST   /
///     └── /:id                   # Resolve-User → Resolve-Todo
///         ├── PUT    /
///         ├── DELETE /
///         └── PATCH  /done
/// ```
///
/// # Middleware Stack
///
/// Applied in order (outermost first):
/// 1. CORS (tower-http CorsLayer)
/// 2. Logging (tower-http TraceLayer)
/// 3. Resolve-User / Resolve-Todo (per-route, via `route_layer`)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let user_routes = Router::new().route("/users", post(routes::users::create_user));

    // Todo item routes (Resolve-Todo runs inside Resolve-User)
    let todo_item_routes = Router::new()
        .route(
            "/todos/:id",
            put(routes::todos::replace_todo).delete(routes::todos::delete_todo),
        )
        .route("/todos/:id/done", patch(routes::todos::mark_todo_done))
        .route_layer(middleware::from_fn(resolve_todo_layer));

    let todo_routes = Router::new()
        .route(
            "/todos",
            get(routes::todos::list_todos).post(routes::todos::create_todo),
        )
        .merge(todo_item_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            resolve_user_layer,
        ));

    Router::new()
        .merge(health_routes)
        .merge(user_routes)
        .merge(todo_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

/// Builds the CORS layer from configuration
///
/// `*` (the default) is fully permissive. Otherwise only the listed origins
/// may call the API, with the methods and headers the routes use.
fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static(USERNAME_HEADER)])
        .max_age(std::time::Duration::from_secs(3600))
}
