//! diarylite-web library - journaling HTTP service
//!
//! JSON API over the DiaryLite SQLite database: accounts and sessions,
//! the daily log, item preferences, and memory search.

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderValue};
use axum::Router;
use sqlx::SqlitePool;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;

pub use crate::error::{ApiError, ApiJson, ApiResult};

/// Largest request body accepted by any route
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

/// Build application router
///
/// Health and account routes are public; everything else requires a
/// session. No response is cacheable.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{delete, get, post};

    // Protected routes (require a session)
    let protected = Router::new()
        .route("/api/home", get(api::home))
        .route("/api/entries", delete(api::delete_all_entries))
        .route("/api/log", get(api::get_log_form).post(api::submit_log))
        .route("/api/prefs", get(api::get_prefs).post(api::update_prefs))
        .route("/api/memories/search", post(api::search_memories))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::require_session,
        ));

    // Public routes
    let public = Router::new()
        .route("/api/register", post(api::register))
        .route("/api/login", post(api::login))
        .route("/api/logout", post(api::logout))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::EXPIRES,
            HeaderValue::from_static("0"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::PRAGMA,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
