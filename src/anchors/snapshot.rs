//! Versioned on-disk form of the anchor history.

use super::entry::AnchorHistoryEntry;
use super::error::HistoryError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version identifier for the history snapshot format
pub const HISTORY_VERSION: u32 = 1;

/// Serializable snapshot of the anchor history.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Snapshot format version
    pub version: u32,

    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,

    /// Entries, most recent first
    pub entries: Vec<AnchorHistoryEntry>,
}

impl HistorySnapshot {
    pub fn new(entries: Vec<AnchorHistoryEntry>) -> Self {
        Self {
            version: HISTORY_VERSION,
            saved_at: Utc::now(),
            entries,
        }
    }

    pub fn to_json(&self) -> Result<String, HistoryError> {
        serde_json::to_string(self).map_err(|e| HistoryError::Serialization(e.to_string()))
    }

    /// Parse a snapshot, rejecting formats this build does not understand.
    pub fn from_json(json: &str) -> Result<Self, HistoryError> {
        let snapshot: HistorySnapshot =
            serde_json::from_str(json).map_err(|e| HistoryError::Deserialization(e.to_string()))?;

        if snapshot.version != HISTORY_VERSION {
            return Err(HistoryError::UnsupportedVersion {
                found: snapshot.version,
                supported: HISTORY_VERSION,
            });
        }

        Ok(snapshot)
    }
}
