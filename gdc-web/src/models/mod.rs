//! Data models for gdc-web
//!
//! - Uploaded drawings bound to a role (previous/current)
//! - Comparison results and their export form
//! - Per-session display state machine

pub mod comparison;
pub mod drawing;
pub mod session;

pub use comparison::{ComparisonOutcome, ComparisonResult, ExportFormat, ResultView};
pub use drawing::{DrawingRole, DrawingSummary, UploadedImage};
pub use session::{
    ComparisonInput, ComparisonSession, SessionError, SessionState, SessionStatus,
    MISSING_DRAWINGS_WARNING,
};
