//! Session lifecycle endpoints
//!
//! - POST   /api/sessions      create
//! - GET    /api/sessions/:id  status snapshot
//! - DELETE /api/sessions/:id  end session

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::models::SessionStatus;
use crate::session::SessionHandle;
use crate::{ApiError, ApiResult, AppState};

/// Response for POST /api/sessions
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Look up a session or answer 404
pub(crate) async fn session_handle(state: &AppState, session_id: Uuid) -> ApiResult<SessionHandle> {
    state
        .sessions
        .get(session_id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Session {}", session_id)))
}

/// POST /api/sessions
pub async fn create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<CreateSessionResponse>) {
    let session_id = state.sessions.create().await;
    info!(session_id = %session_id, "Comparison session started");
    (StatusCode::CREATED, Json(CreateSessionResponse { session_id }))
}

/// GET /api/sessions/:id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<Json<SessionStatus>> {
    let handle = session_handle(&state, session_id).await?;
    let status = handle.lock().await.status();
    Ok(Json(status))
}

/// DELETE /api/sessions/:id
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    if state.sessions.remove(session_id).await {
        info!(session_id = %session_id, "Comparison session ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Session {}", session_id)))
    }
}

/// Build session routes
pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", get(get_session).delete(end_session))
}
