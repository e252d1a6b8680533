//! User-facing notices raised by recoverable failures.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A non-fatal condition the user should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StudioNotice {
    /// A write was dropped because the store is full; memory still has the change
    StorageFull { key: String },
    /// The active persona was deleted and the first built-in took its place
    PersonaFallback { name: String },
}

impl StudioNotice {
    pub fn message(&self) -> String {
        match self {
            Self::StorageFull { .. } => {
                "Local storage is full; your latest change will not survive a reload.".to_string()
            }
            Self::PersonaFallback { name } => {
                format!("The selected persona was deleted, switched to \"{}\".", name)
            }
        }
    }
}

/// Shared queue of pending notices, drained by the presentation layer.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    pending: Arc<Mutex<VecDeque<StudioNotice>>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: StudioNotice) {
        // A poisoned lock only means a panic elsewhere; the queue is still usable.
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.push_back(notice);
    }

    /// Removes and returns every pending notice, oldest first.
    pub fn drain(&self) -> Vec<StudioNotice> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
