//! UI Routes - single-page web interface
//!
//! HTML is rendered server-side; `compare.js` (vanilla ES6, no frameworks)
//! drives the session API with fetch calls.
//!
//! - **Static Assets** (`static_assets`): CSS/JS embedded at compile time
//! - **Root Page** (`root`): upload, compare, results, sidebar

use crate::AppState;
use axum::{routing::get, Router};

mod root;
mod static_assets;

use root::root_page;
use static_assets::{serve_compare_js, serve_gdc_ui_css};

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root_page))
        .route("/static/gdc-ui.css", get(serve_gdc_ui_css))
        .route("/static/compare.js", get(serve_compare_js))
}
