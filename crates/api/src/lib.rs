//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - The landing page with the post list and backend status
//! - Multipart upload and image download routes
//! - Health check
//! - Static assets for the upload form

pub mod error;
pub mod routes;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use imgboard_core::storage::StorageContext;
use imgboard_shared::AppConfig;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Remote backends plus the in-memory fallback.
    pub storage: Arc<StorageContext>,
    /// Maximum accepted request body in bytes.
    pub max_upload_bytes: usize,
    /// Directory served under `/static`.
    pub static_dir: PathBuf,
    /// Whole-request timeout.
    pub request_timeout: Duration,
}

impl AppState {
    /// State with default server settings.
    #[must_use]
    pub fn new(storage: Arc<StorageContext>) -> Self {
        Self::from_config(storage, &AppConfig::default())
    }

    /// State with settings taken from application config.
    #[must_use]
    pub fn from_config(storage: Arc<StorageContext>, config: &AppConfig) -> Self {
        Self {
            storage,
            max_upload_bytes: config.upload.max_bytes,
            static_dir: PathBuf::from(&config.server.static_dir),
            request_timeout: Duration::from_secs(config.server.request_timeout_secs),
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .layer(DefaultBodyLimit::max(state.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            state.request_timeout,
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
