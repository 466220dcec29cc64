//! Per-session state
//!
//! Display states, derived from what the session holds:
//! AWAITING_DRAWINGS → DRAWINGS_BOUND → COMPARISON_PENDING → RESULT_SHOWN
//!
//! Clearing returns to AWAITING_DRAWINGS. Transitions happen only on user
//! actions. Idle sessions are dropped by the store's sweeper.

use super::{ComparisonResult, DrawingRole, DrawingSummary, ResultView, UploadedImage};
use chrono::{DateTime, Utc};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Warning shown when start-comparison is triggered with an empty slot
pub const MISSING_DRAWINGS_WARNING: &str =
    "Please upload both previous and current drawings before starting the comparison.";

/// Session display state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// Zero or one drawing bound, no result
    AwaitingDrawings,
    /// Both slots bound, no result yet
    DrawingsBound,
    /// Outbound comparison in flight
    ComparisonPending,
    /// Latest result available
    ResultShown,
}

/// Why a start-comparison action was refused
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("{}", MISSING_DRAWINGS_WARNING)]
    MissingDrawings { missing: Vec<DrawingRole> },

    #[error("A comparison is already running for this session")]
    ComparisonPending,
}

/// Bitmaps handed to the encoder for one comparison, previous first
#[derive(Debug, Clone)]
pub struct ComparisonInput {
    pub previous: DynamicImage,
    pub current: DynamicImage,
}

/// State of one interactive session
#[derive(Debug)]
pub struct ComparisonSession {
    pub session_id: Uuid,
    previous: Option<UploadedImage>,
    current: Option<UploadedImage>,
    result: Option<ComparisonResult>,
    pending: bool,
    pub created_at: DateTime<Utc>,
    last_active: DateTime<Utc>,
}

impl ComparisonSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            previous: None,
            current: None,
            result: None,
            pending: false,
            created_at: now,
            last_active: now,
        }
    }

    /// Record user activity
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }

    pub fn last_active(&self) -> DateTime<Utc> {
        self.last_active
    }

    /// Idle for at least `ttl` as of `now`
    ///
    /// A comparison in flight keeps the session alive.
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        if self.pending {
            return false;
        }
        match now.signed_duration_since(self.last_active).to_std() {
            Ok(idle) => idle >= ttl,
            Err(_) => false,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.pending {
            SessionState::ComparisonPending
        } else if self.result.is_some() {
            SessionState::ResultShown
        } else if self.previous.is_some() && self.current.is_some() {
            SessionState::DrawingsBound
        } else {
            SessionState::AwaitingDrawings
        }
    }

    /// Bind (or replace) the drawing for a role
    ///
    /// An existing result stays visible until the next comparison.
    pub fn bind(&mut self, role: DrawingRole, image: UploadedImage) {
        match role {
            DrawingRole::Previous => self.previous = Some(image),
            DrawingRole::Current => self.current = Some(image),
        }
    }

    pub fn drawing(&self, role: DrawingRole) -> Option<&UploadedImage> {
        match role {
            DrawingRole::Previous => self.previous.as_ref(),
            DrawingRole::Current => self.current.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        self.result.as_ref()
    }

    /// Enter COMPARISON_PENDING and hand out the bitmaps to encode
    ///
    /// Refused, with state unchanged, unless both slots are bound.
    pub fn begin_comparison(&mut self) -> Result<ComparisonInput, SessionError> {
        if self.pending {
            return Err(SessionError::ComparisonPending);
        }

        let (previous, current) = match (&self.previous, &self.current) {
            (Some(previous), Some(current)) => (previous, current),
            _ => {
                let missing = [DrawingRole::Previous, DrawingRole::Current]
                    .into_iter()
                    .filter(|role| self.drawing(*role).is_none())
                    .collect();
                return Err(SessionError::MissingDrawings { missing });
            }
        };

        let input = ComparisonInput {
            previous: previous.bitmap.clone(),
            current: current.bitmap.clone(),
        };
        self.pending = true;
        Ok(input)
    }

    /// Store the result of the pending comparison, replacing any older one
    pub fn finish_comparison(&mut self, result: ComparisonResult) {
        self.pending = false;
        self.result = Some(result);
    }

    /// Leave COMPARISON_PENDING without a result
    pub fn abort_comparison(&mut self) {
        self.pending = false;
    }

    /// Back to the initial display state: no drawings, no result, no timestamp
    ///
    /// Refused while a comparison is in flight.
    pub fn clear(&mut self) -> Result<(), SessionError> {
        if self.pending {
            return Err(SessionError::ComparisonPending);
        }
        self.previous = None;
        self.current = None;
        self.result = None;
        Ok(())
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            session_id: self.session_id,
            state: self.state(),
            previous: self.previous.as_ref().map(|d| d.summary(DrawingRole::Previous)),
            current: self.current.as_ref().map(|d| d.summary(DrawingRole::Current)),
            result: self.result.as_ref().map(ComparisonResult::view),
        }
    }
}

impl Default for ComparisonSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable snapshot of a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStatus {
    pub session_id: Uuid,
    pub state: SessionState,
    pub previous: Option<DrawingSummary>,
    pub current: Option<DrawingSummary>,
    pub result: Option<ResultView>,
}
