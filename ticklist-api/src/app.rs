/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use ticklist_api::{app::AppState, config::Config};
/// use ticklist_shared::{db::pool::{create_pool, PoolConfig}, store::PgStore};
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(PoolConfig::new(config.database.url.clone())).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = ticklist_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, middleware::security::SecurityHeadersLayer, routes};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use ticklist_shared::{auth::session::SessionManager, store::Store};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistence backend
    pub store: Arc<dyn Store>,

    /// Session manager built from the configured secret and lifetime
    pub sessions: SessionManager,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            sessions: SessionManager::new(config.session.secret.clone(), config.session_ttl()),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Routes
///
/// ```text
/// /
/// ├── GET        /              # Home (public)
/// ├── GET        /health        # Health check (public)
/// ├── GET, POST  /sign-up       # Registration (public)
/// ├── GET, POST  /sign-in       # Sign-in (public)
/// ├── GET        /logout        # End session
/// ├── GET, POST  /tasks         # Task list (signed in)
/// ├── POST       /add           # New task (signed in)
/// ├── GET        /update/:id    # Toggle completion (signed in)
/// └── GET        /delete/:id    # Delete task (signed in)
/// ```
///
/// Handlers of signed-in routes check access themselves and redirect
/// anonymous requests to `/sign-in`.
pub fn build_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(routes::home::index))
        .route("/health", get(routes::health::health_check))
        .route(
            "/sign-up",
            get(routes::auth::sign_up_page).post(routes::auth::sign_up),
        )
        .route(
            "/sign-in",
            get(routes::auth::sign_in_page).post(routes::auth::sign_in),
        )
        .route("/logout", get(routes::auth::logout));

    let task_routes = Router::new()
        .route(
            "/tasks",
            get(routes::tasks::list_tasks).post(routes::tasks::list_tasks),
        )
        .route("/add", post(routes::tasks::add_task))
        .route("/update/:id", get(routes::tasks::toggle_task))
        .route("/delete/:id", get(routes::tasks::delete_task));

    let production = state.config.server.production;

    Router::new()
        .merge(public_routes)
        .merge(task_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SecurityHeadersLayer::new(production))
        .with_state(state)
}
