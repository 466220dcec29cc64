//! gdc-web library interface
//!
//! Exposes the router and state for the binary and for integration tests.

pub mod api;
pub mod error;
pub mod models;
pub mod services;
pub mod session;

pub use crate::error::{ApiError, ApiResult};

use axum::extract::DefaultBodyLimit;
use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;

use crate::services::DrawingComparator;
use crate::session::SessionStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Interactive sessions, one per browser tab
    pub sessions: SessionStore,
    /// Comparison backend (chat-completion client in production)
    pub comparator: Arc<dyn DrawingComparator>,
    /// Upload body limit in bytes
    pub max_upload_bytes: usize,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
    /// Last comparison failure, for diagnostics
    pub last_error: Arc<RwLock<Option<String>>>,
}

impl AppState {
    pub fn new(comparator: Arc<dyn DrawingComparator>, max_upload_bytes: usize) -> Self {
        Self {
            sessions: SessionStore::new(),
            comparator,
            max_upload_bytes,
            startup_time: Utc::now(),
            last_error: Arc::new(RwLock::new(None)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        // UI routes (HTML page, static assets)
        .merge(api::ui_routes())
        // API routes
        .merge(api::session_routes())
        .merge(api::drawing_routes())
        .merge(api::comparison_routes())
        .merge(api::health_routes())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
