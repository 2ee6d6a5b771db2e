//! Capacity- and age-bounded collection of placed markers.

use super::entry::AnchorHistoryEntry;
use super::error::HistoryError;
use super::snapshot::HistorySnapshot;
use crate::config::HistoryConfig;
use crate::geo::Coordinate;
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use log::{debug, info};

/// Markers placed in recent sessions, most recent first.
///
/// Holds at most `storage_limit` entries after every mutation. Entries older
/// than `max_age` are dropped whenever the history is loaded.
#[derive(Clone, Debug)]
pub struct AnchorHistory {
    limits: HistoryConfig,
    entries: Vec<AnchorHistoryEntry>,
}

impl AnchorHistory {
    pub fn new(limits: HistoryConfig) -> Self {
        Self {
            limits,
            entries: Vec::new(),
        }
    }

    /// Whether a marker already stands at `coordinate`.
    ///
    /// Two coordinates match when both axis deltas are strictly below the
    /// similarity threshold.
    pub fn exists(&self, coordinate: &Coordinate) -> bool {
        let threshold = self.limits.similarity_threshold_deg;
        self.entries
            .iter()
            .any(|e| e.coordinate.strictly_within(coordinate, threshold))
    }

    /// Insert an entry, keeping recency order and the storage limit.
    pub fn add(&mut self, entry: AnchorHistoryEntry) {
        debug!("Recording {:?} anchor at {}", entry.kind, entry.coordinate);
        self.entries.push(entry);
        self.enforce_limit();
    }

    /// Load from `store`, purging stale entries and writing the result back.
    ///
    /// A missing key yields an empty history.
    pub fn load<K: KeyValueStore + ?Sized>(
        store: &mut K,
        limits: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        Self::load_at(store, limits, Utc::now())
    }

    /// [`AnchorHistory::load`] with an explicit clock.
    pub fn load_at<K: KeyValueStore + ?Sized>(
        store: &mut K,
        limits: HistoryConfig,
        now: DateTime<Utc>,
    ) -> Result<Self, HistoryError> {
        let Some(json) = store.get(&limits.storage_key) else {
            debug!("No anchor history under {:?}", limits.storage_key);
            return Ok(Self::new(limits));
        };

        let snapshot = HistorySnapshot::from_json(&json)?;
        let loaded = snapshot.entries.len();

        let max_age = limits.max_age();
        let mut history = Self::new(limits);
        history.entries = snapshot
            .entries
            .into_iter()
            .filter(|e| e.age(now) <= max_age)
            .collect();
        history.enforce_limit();

        let purged = loaded - history.entries.len();
        if purged > 0 {
            info!("Purged {} stale anchor(s) from history", purged);
        }

        history.save(store)?;
        Ok(history)
    }

    /// Write the current entries to `store`.
    pub fn save<K: KeyValueStore + ?Sized>(&self, store: &mut K) -> Result<(), HistoryError> {
        let json = HistorySnapshot::new(self.entries.clone()).to_json()?;
        store.set(&self.limits.storage_key, json);
        debug!("Saved {} anchor(s)", self.entries.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, most recent first.
    pub fn entries(&self) -> &[AnchorHistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limits(&self) -> &HistoryConfig {
        &self.limits
    }

    fn enforce_limit(&mut self) {
        self.entries
            .sort_by(|left, right| right.created_at.cmp(&left.created_at));
        self.entries.truncate(self.limits.storage_limit);
    }
}
