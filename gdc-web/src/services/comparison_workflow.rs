//! Start-comparison orchestration
//!
//! 1. Check both drawings are bound, enter COMPARISON_PENDING
//! 2. Re-encode both bitmaps (blocking worker, previous then current)
//! 3. One comparator call
//! 4. Store the result with its completion timestamp
//!
//! Steps 2-4 run on a spawned task that owns the session handle. A caller
//! that goes away mid-call (closed tab, dropped connection) does not leave
//! the session stuck in COMPARISON_PENDING: the task still stores the
//! result, or aborts the pending state on failure. The session lock is
//! released during steps 2 and 3.

use chrono::Local;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use super::image_encoder::{encode_jpeg_base64, EncodeError};
use super::vision_client::DrawingComparator;
use crate::models::{ComparisonInput, ComparisonOutcome, ComparisonResult, SessionError};
use crate::session::SessionHandle;

/// Why a comparison produced no result
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Rejected(#[from] SessionError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("Comparison task failed: {0}")]
    Internal(String),
}

/// Run one comparison for a session
///
/// A failed outbound call is not an error here: it becomes a result whose
/// text reads `"Error occurred: <message>"`.
pub async fn run_comparison(
    session: SessionHandle,
    comparator: Arc<dyn DrawingComparator>,
) -> Result<ComparisonResult, WorkflowError> {
    // No await between entering pending and spawning the worker
    let (session_id, input) = {
        let mut guard = session.lock().await;
        let input = guard.begin_comparison()?;
        (guard.session_id, input)
    };

    let worker_session = session.clone();
    let worker = tokio::spawn(async move {
        complete_comparison(&worker_session, comparator.as_ref(), session_id, input).await
    });

    match worker.await {
        Ok(result) => result,
        Err(e) => {
            // Worker panicked; never leave the session pending
            tracing::error!(session_id = %session_id, error = %e, "Comparison task failed");
            session.lock().await.abort_comparison();
            Err(WorkflowError::Internal(e.to_string()))
        }
    }
}

/// Encode, compare and store; always leaves COMPARISON_PENDING
async fn complete_comparison(
    session: &SessionHandle,
    comparator: &dyn DrawingComparator,
    session_id: Uuid,
    input: ComparisonInput,
) -> Result<ComparisonResult, WorkflowError> {
    let encoded = tokio::task::spawn_blocking(move || encode_pair(&input))
        .await
        .map_err(|e| WorkflowError::Internal(e.to_string()))
        .and_then(|r| r.map_err(WorkflowError::from));

    let (previous, current) = match encoded {
        Ok(pair) => pair,
        Err(e) => {
            tracing::error!(session_id = %session_id, error = %e, "Drawing encoding failed");
            session.lock().await.abort_comparison();
            return Err(e);
        }
    };

    let outcome = ComparisonOutcome::from_result(comparator.compare(&previous, &current).await);
    if let ComparisonOutcome::Failed(reason) = &outcome {
        tracing::warn!(session_id = %session_id, reason = %reason, "Comparison failed");
    } else {
        tracing::info!(session_id = %session_id, "Comparison completed");
    }

    let result = ComparisonResult::new(outcome, Local::now());
    session.lock().await.finish_comparison(result.clone());
    Ok(result)
}

fn encode_pair(input: &ComparisonInput) -> Result<(String, String), EncodeError> {
    let previous = encode_jpeg_base64(&input.previous)?;
    let current = encode_jpeg_base64(&input.current)?;
    Ok((previous, current))
}
