//! Single-slot selection state machine gating the QR detail view

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;

use crate::models::Resident;

/// Observable states of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionState {
    Idle,
    Selected,
}

impl std::fmt::Display for SelectionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SelectionState::Idle => write!(f, "idle"),
            SelectionState::Selected => write!(f, "selected"),
        }
    }
}

/// The resident currently shown, and when its detail view opened
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveSelection {
    pub resident: Arc<Resident>,
    pub opened_at: DateTime<Utc>,
}

/// Tracks which resident (if any) has its detail view open
///
/// `detail_visible()` is true exactly when a resident is active, so the
/// invariant "visible implies active" holds by construction. Every state
/// change bumps the revision and notifies subscribers; I/O never happens here.
#[derive(Debug)]
pub struct SelectionController {
    active: Option<ActiveSelection>,
    revision: u64,
    notify: watch::Sender<u64>,
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionController {
    /// Fresh controller in `Idle`
    pub fn new() -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            active: None,
            revision: 0,
            notify,
        }
    }

    pub fn state(&self) -> SelectionState {
        if self.active.is_some() {
            SelectionState::Selected
        } else {
            SelectionState::Idle
        }
    }

    pub fn active_resident(&self) -> Option<&Arc<Resident>> {
        self.active.as_ref().map(|a| &a.resident)
    }

    pub fn active(&self) -> Option<&ActiveSelection> {
        self.active.as_ref()
    }

    pub fn detail_visible(&self) -> bool {
        self.active.is_some()
    }

    /// Incremented on every observable state change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Receiver that wakes on every state change; carries the revision
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    /// Move to `Selected` with `resident`, replacing any previous selection
    pub fn select(&mut self, resident: Arc<Resident>) {
        self.select_at(resident, Utc::now());
    }

    pub fn select_at(&mut self, resident: Arc<Resident>, opened_at: DateTime<Utc>) {
        log::debug!(
            "selection {} -> selected (resident {})",
            self.state(),
            resident.id
        );
        self.active = Some(ActiveSelection { resident, opened_at });
        self.bump();
    }

    /// Move to `Idle`; a no-op when already idle
    pub fn dismiss(&mut self) {
        if self.active.take().is_some() {
            log::debug!("selection selected -> idle");
            self.bump();
        }
    }

    fn bump(&mut self) {
        self.revision += 1;
        self.notify.send_replace(self.revision);
    }
}
