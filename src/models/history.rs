use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A finalized japa session, recorded when the donor submits.
///
/// History entries are **immutable**—created only by
/// [`SessionEngine::submit`](crate::engine::SessionEngine::submit) and
/// destroyed only by [`HistoryStore::clear`](crate::history::HistoryStore::clear).
/// They are held in memory for the lifetime of the process; durable storage
/// is an external concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub mantra_name: String,
    /// Repetitions counted when the session completed.
    pub total_count: u32,
    /// Seconds of active playback accumulated over the session.
    pub duration_seconds: u64,
    pub submitted_at: DateTime<Utc>,
    pub donor: Donor,
}

/// Donor metadata captured at submit time.
///
/// All four fields are required and must be non-empty. `gotra` is a free-text
/// lineage identifier; no format validation is applied to any field beyond
/// non-emptiness (phone numbers included).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Donor {
    pub name: String,
    pub gotra: String,
    pub city: String,
    pub phone: String,
}

impl Donor {
    /// Names of the required fields that are empty after trimming.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.gotra.trim().is_empty() {
            missing.push("gotra");
        }
        if self.city.trim().is_empty() {
            missing.push("city");
        }
        if self.phone.trim().is_empty() {
            missing.push("phone");
        }
        missing
    }
}
