//! HTTP API handlers for gdc-web
//!
//! All session routes live under `/api/sessions/:id`; the page at `/`
//! drives them with fetch calls.

pub mod comparison;
pub mod drawings;
pub mod health;
pub mod sessions;
pub mod ui;

pub use comparison::comparison_routes;
pub use drawings::drawing_routes;
pub use health::health_routes;
pub use sessions::session_routes;
pub use ui::ui_routes;
