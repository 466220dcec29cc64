//! Static asset handlers
//!
//! Embeds and serves CSS/JS files at compile time

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

const GDC_UI_CSS: &str = include_str!("../../../static/gdc-ui.css");
const COMPARE_JS: &str = include_str!("../../../static/compare.js");

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", content_type),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response()
}

/// GET /static/gdc-ui.css
pub async fn serve_gdc_ui_css() -> Response {
    asset("text/css", GDC_UI_CSS)
}

/// GET /static/compare.js
pub async fn serve_compare_js() -> Response {
    asset("application/javascript", COMPARE_JS)
}
