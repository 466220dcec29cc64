//! Error types for gdc-web
//!
//! Every handler error renders as `{"error": {"code", "message"}}` with a
//! matching status code. A missing drawing is a warning the page shows as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::SessionError;
use crate::services::{EncodeError, WorkflowError};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Start-comparison with an empty slot (400, user-visible warning)
    #[error("{0}")]
    MissingDrawings(String),

    /// Upload that is not a decodable JPEG/PNG (400)
    #[error("Invalid drawing: {0}")]
    InvalidDrawing(#[from] EncodeError),

    /// Conflict (409) - comparison already running for the session
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// gdc-common error
    #[error("Common error: {0}")]
    Common(#[from] gdc_common::Error),
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::MissingDrawings { .. } => ApiError::MissingDrawings(err.to_string()),
            SessionError::ComparisonPending => ApiError::Conflict(err.to_string()),
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Rejected(e) => e.into(),
            WorkflowError::Encode(e) => ApiError::Internal(e.to_string()),
            WorkflowError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::MissingDrawings(msg) => (StatusCode::BAD_REQUEST, "MISSING_DRAWINGS", msg),
            ApiError::InvalidDrawing(ref err) => {
                (StatusCode::BAD_REQUEST, "INVALID_DRAWING", err.to_string())
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Common(ref err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "COMMON_ERROR",
                err.to_string(),
            ),
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
