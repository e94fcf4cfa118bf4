//! In-memory session history.
//!
//! Newest-first, append-only for the lifetime of the process. Handles are
//! cheap to clone and share one underlying list.

use std::sync::{Arc, Mutex};

use crate::models::HistoryEntry;

pub struct HistoryStore {
    entries: Arc<Mutex<Vec<HistoryEntry>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Insert at the head; prior entries keep their relative order.
    pub fn append(&self, entry: HistoryEntry) {
        let mut entries = self.entries.lock().expect("history lock poisoned");
        entries.insert(0, entry);
    }

    /// Every entry, newest first.
    pub fn all(&self) -> Vec<HistoryEntry> {
        let entries = self.entries.lock().expect("history lock poisoned");
        entries.clone()
    }

    pub fn len(&self) -> usize {
        let entries = self.entries.lock().expect("history lock poisoned");
        entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry. Irreversible; callers are expected to gate this
    /// behind a confirmation step.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().expect("history lock poisoned");
        let removed = entries.len();
        entries.clear();
        tracing::info!(removed, "history cleared");
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for HistoryStore {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}
