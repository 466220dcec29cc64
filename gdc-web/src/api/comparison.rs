//! Comparison endpoints
//!
//! - POST   /api/sessions/:id/compare          start-comparison
//! - DELETE /api/sessions/:id/result           clear-results
//! - GET    /api/sessions/:id/result/download  `?format=md|txt`

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use super::sessions::session_handle;
use crate::models::{ExportFormat, ResultView, SessionStatus};
use crate::services::{run_comparison, WorkflowError};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/sessions/:id/compare
///
/// Issues exactly one outbound request when both drawings are bound, none
/// otherwise. A failed outbound call still answers 200: its text reads
/// `"Error occurred: <message>"` and `succeeded` is false. If the client
/// disconnects mid-call the comparison still completes and is stored.
pub async fn start_comparison(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<ResultView>> {
    let handle = session_handle(&state, session_id).await?;

    let result = run_comparison(handle, state.comparator.clone())
        .await
        .map_err(|e| {
            if let WorkflowError::Rejected(reason) = &e {
                warn!(session_id = %session_id, "Comparison refused: {}", reason);
            }
            ApiError::from(e)
        })?;

    if !result.outcome.succeeded() {
        *state.last_error.write().await = Some(result.text());
    }

    Ok(Json(result.view()))
}

/// DELETE /api/sessions/:id/result
///
/// Resets result text, timestamp and both drawings.
pub async fn clear_results(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionStatus>> {
    let handle = session_handle(&state, session_id).await?;
    let mut session = handle.lock().await;
    session.clear()?;

    info!(session_id = %session_id, "Comparison results cleared");
    Ok(Json(session.status()))
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    pub format: Option<String>,
}

/// GET /api/sessions/:id/result/download
pub async fn download_result(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<DownloadQuery>,
) -> ApiResult<Response> {
    let format = match query.format.as_deref() {
        None => ExportFormat::Md,
        Some(raw) => raw.parse().map_err(ApiError::BadRequest)?,
    };

    let handle = session_handle(&state, session_id).await?;
    let session = handle.lock().await;
    let result = session
        .result()
        .ok_or_else(|| ApiError::NotFound("No comparison result to download".to_string()))?;

    let filename = result.export_filename(format);
    let content = result.export_content(format);

    Ok((
        [
            (header::CONTENT_TYPE, format.mime_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        content,
    )
        .into_response())
}

/// Build comparison routes
pub fn comparison_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions/:id/compare", post(start_comparison))
        .route("/api/sessions/:id/result", delete(clear_results))
        .route("/api/sessions/:id/result/download", get(download_result))
}
