//! Per-browser view sessions
//!
//! Each session owns its own selection controller and filter query; nothing
//! about the current view lives in process-wide state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::label::TransactionIdFormatter;
use crate::selection::{SelectionController, SelectionState};

/// Upper bound on live sessions; the least recently used one is dropped
pub const MAX_SESSIONS: usize = 1024;

/// State owned by one view session
#[derive(Debug)]
pub struct ViewSession {
    pub selection: SelectionController,
    query: String,
    last_seen: DateTime<Utc>,
}

impl Default for ViewSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewSession {
    /// Idle selection, empty query
    pub fn new() -> Self {
        Self {
            selection: SelectionController::new(),
            query: String::new(),
            last_seen: Utc::now(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    /// Label of the open detail view, stable for as long as it stays open
    pub fn transaction_label(&self, formatter: &TransactionIdFormatter) -> Option<String> {
        self.selection
            .active()
            .map(|a| formatter.format(&a.resident, a.opened_at))
    }

    pub fn snapshot(&self, formatter: &TransactionIdFormatter) -> SessionSnapshot {
        SessionSnapshot {
            state: self.selection.state(),
            active_resident_id: self.selection.active_resident().map(|r| r.id),
            detail_visible: self.selection.detail_visible(),
            transaction_label: self.transaction_label(formatter),
            query: self.query.clone(),
            revision: self.selection.revision(),
        }
    }
}

/// Serializable view of a session for the JSON API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub state: SelectionState,
    pub active_resident_id: Option<u32>,
    pub detail_visible: bool,
    pub transaction_label: Option<String>,
    pub query: String,
    pub revision: u64,
}

/// Session id → view session
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<String, ViewSession>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve the caller's session, starting a fresh one when the id is
    /// missing or unknown. Returns the id to use from now on.
    pub async fn open(&self, id: Option<&str>) -> String {
        let mut sessions = self.sessions.lock().await;
        if let Some(id) = id {
            if let Some(session) = sessions.get_mut(id) {
                session.last_seen = Utc::now();
                return id.to_string();
            }
        }
        if sessions.len() >= MAX_SESSIONS {
            evict_oldest(&mut sessions);
        }
        let id = iuranweb_utils::generate_id();
        log::debug!("starting view session {}", id);
        sessions.insert(id.clone(), ViewSession::new());
        id
    }

    /// Run a synchronous mutation against one session
    ///
    /// The lock is released when `f` returns, so callers must not try to
    /// hold session state across an await point.
    pub async fn with_session<R>(&self, id: &str, f: impl FnOnce(&mut ViewSession) -> R) -> R {
        let mut sessions = self.sessions.lock().await;
        if !sessions.contains_key(id) && sessions.len() >= MAX_SESSIONS {
            evict_oldest(&mut sessions);
        }
        let session = sessions.entry(id.to_string()).or_default();
        session.last_seen = Utc::now();
        f(session)
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }
}

fn evict_oldest(sessions: &mut HashMap<String, ViewSession>) {
    let oldest = sessions
        .iter()
        .min_by_key(|(_, s)| s.last_seen)
        .map(|(id, _)| id.clone());
    if let Some(id) = oldest {
        log::debug!("evicting view session {}", id);
        sessions.remove(&id);
    }
}
