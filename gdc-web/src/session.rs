//! In-memory session store
//!
//! Each browser session owns one `ComparisonSession`, created on demand and
//! dropped on end-session or after sitting idle past the configured
//! time-to-live. Nothing is persisted.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::models::ComparisonSession;

/// How often the sweeper looks for idle sessions
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Shared handle to one session's state
pub type SessionHandle = Arc<Mutex<ComparisonSession>>;

/// Session registry keyed by session id
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, SessionHandle>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fresh session and return its id
    pub async fn create(&self) -> Uuid {
        let session = ComparisonSession::new();
        let session_id = session.session_id;

        self.sessions
            .write()
            .await
            .insert(session_id, Arc::new(Mutex::new(session)));

        tracing::debug!(session_id = %session_id, "Session created");
        session_id
    }

    /// Look up a session and mark it active
    pub async fn get(&self, session_id: Uuid) -> Option<SessionHandle> {
        let handle = self.sessions.read().await.get(&session_id).cloned()?;
        handle.lock().await.touch();
        Some(handle)
    }

    /// End a session; returns false if it did not exist
    pub async fn remove(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            tracing::debug!(session_id = %session_id, "Session ended");
        }
        removed
    }

    /// Drop sessions idle for at least `ttl` as of `now`
    ///
    /// Sessions locked by a request in progress are skipped. Returns the
    /// number of sessions removed.
    pub async fn evict_idle(&self, ttl: Duration, now: DateTime<Utc>) -> usize {
        let mut sessions = self.sessions.write().await;

        let expired: Vec<Uuid> = sessions
            .iter()
            .filter(|(_, handle)| match handle.try_lock() {
                Ok(session) => session.is_expired(ttl, now),
                Err(_) => false,
            })
            .map(|(id, _)| *id)
            .collect();

        for session_id in &expired {
            sessions.remove(session_id);
            tracing::info!(session_id = %session_id, "Idle session expired");
        }

        expired.len()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

/// Periodically drop sessions idle past `ttl`
pub fn spawn_idle_sweeper(store: SessionStore, ttl: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(SWEEP_INTERVAL.min(ttl));
        tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tick.tick().await;
            let evicted = store.evict_idle(ttl, Utc::now()).await;
            if evicted > 0 {
                let remaining = store.len().await;
                tracing::debug!(evicted, remaining, "Session sweep");
            }
        }
    })
}
