//! History tracker: the append-only record of confirmed occurrences.

use std::path::PathBuf;

use cadence_core::types::{CadenceError, EpochMs, HistoryEntry};

use crate::store::FileStore;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Full history record; empty when the file does not exist yet.
    ///
    /// Always bypasses the read cache: the deduplicating append must
    /// observe writes made earlier in the same run.
    pub fn get(&self, store: &mut FileStore) -> Result<Vec<HistoryEntry>, CadenceError> {
        Ok(store.load(&self.path, false)?.unwrap_or_default())
    }

    /// Append a timestamp unless it is already recorded. Idempotent;
    /// the record is only committed once the write succeeds.
    pub fn append(&self, store: &mut FileStore, timestamp: EpochMs) -> Result<(), CadenceError> {
        let mut history = self.get(store)?;
        if history.iter().any(|entry| entry.datetime_utc == timestamp) {
            return Ok(());
        }
        history.push(HistoryEntry {
            datetime_utc: timestamp,
        });
        store.save(&self.path, &history)
    }

    /// Whether the record holds enough points to fit the model.
    pub fn has_sufficient_data(
        &self,
        store: &mut FileStore,
        min_points: usize,
    ) -> Result<bool, CadenceError> {
        Ok(self.get(store)?.len() >= min_points)
    }

}

// ─── Tests ────────────────────────────────────────────────────────
