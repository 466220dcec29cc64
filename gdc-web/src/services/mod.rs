//! Services for gdc-web
//!
//! - `image_encoder`: upload decoding, JPEG/base64 re-encoding
//! - `vision_client`: chat-completion request for the comparison
//! - `comparison_workflow`: start-comparison orchestration per session
//! - `markdown`: result text to HTML for the page

pub mod comparison_workflow;
pub mod image_encoder;
pub mod markdown;
pub mod vision_client;

pub use comparison_workflow::{run_comparison, WorkflowError};
pub use image_encoder::{decode_upload, encode_jpeg_base64, EncodeError};
pub use markdown::render_markdown;
pub use vision_client::{compare_drawings, ComparisonError, DrawingComparator, VisionClient};
