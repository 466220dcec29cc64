//! Drawing upload and preview endpoints
//!
//! - POST /api/sessions/:id/drawings/:role  multipart upload (field `file`)
//! - GET  /api/sessions/:id/drawings/:role  uploaded bytes, for the preview

use axum::{
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::sessions::session_handle;
use crate::models::{DrawingRole, DrawingSummary};
use crate::services::decode_upload;
use crate::{ApiError, ApiResult, AppState};

/// Multipart field carrying the drawing
const FILE_FIELD: &str = "file";

fn parse_role(role: &str) -> ApiResult<DrawingRole> {
    role.parse().map_err(ApiError::BadRequest)
}

/// POST /api/sessions/:id/drawings/:role
///
/// Decodes the upload and binds it to the role, replacing any earlier
/// drawing. An undecodable file leaves the slot unchanged.
pub async fn upload_drawing(
    State(state): State<AppState>,
    Path((session_id, role)): Path<(Uuid, String)>,
    mut multipart: Multipart,
) -> ApiResult<Json<DrawingSummary>> {
    let role = parse_role(&role)?;
    let handle = session_handle(&state, session_id).await?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("drawing").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?;
        upload = Some((file_name, bytes.to_vec()));
        break;
    }

    let (file_name, bytes) = upload.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing multipart field '{}'", FILE_FIELD))
    })?;

    let image = tokio::task::spawn_blocking(move || decode_upload(&file_name, bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("Decode task failed: {}", e)))?
        .map_err(|e| {
            warn!(session_id = %session_id, role = %role, error = %e, "Rejected drawing upload");
            ApiError::from(e)
        })?;

    let summary = image.summary(role);
    handle.lock().await.bind(role, image);

    info!(
        session_id = %session_id,
        role = %role,
        file_name = %summary.file_name,
        width = summary.width,
        height = summary.height,
        "Drawing bound"
    );

    Ok(Json(summary))
}

/// GET /api/sessions/:id/drawings/:role
pub async fn get_drawing(
    State(state): State<AppState>,
    Path((session_id, role)): Path<(Uuid, String)>,
) -> ApiResult<Response> {
    let role = parse_role(&role)?;
    let handle = session_handle(&state, session_id).await?;
    let session = handle.lock().await;

    let drawing = session
        .drawing(role)
        .ok_or_else(|| ApiError::NotFound(format!("No {} drawing uploaded", role)))?;

    Ok((
        [
            (header::CONTENT_TYPE, drawing.content_type()),
            (header::CACHE_CONTROL, "no-store"),
        ],
        drawing.bytes.clone(),
    )
        .into_response())
}

/// Build drawing routes
pub fn drawing_routes() -> Router<AppState> {
    Router::new().route(
        "/api/sessions/:id/drawings/:role",
        get(get_drawing).post(upload_drawing),
    )
}
