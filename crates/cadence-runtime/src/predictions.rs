//! Prediction store: generates and persists the forecast document.

use std::path::PathBuf;

use cadence_core::forecast::{IntervalForecaster, MIN_HISTORY_POINTS};
use cadence_core::types::{CadenceError, EpochMs, PredictionEntry};

use crate::history::HistoryStore;
use crate::store::FileStore;

#[derive(Debug, Clone, Default)]
pub struct PredictionStore {
    path: PathBuf,
    forecaster: IntervalForecaster,
}

impl PredictionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            forecaster: IntervalForecaster::default(),
        }
    }

    /// Regenerate the forecast from the full history and overwrite the
    /// persisted prediction document (replace, not merge).
    ///
    /// Requires sufficient history; on failure nothing is written and
    /// the previous document stays intact.
    pub fn generate(
        &self,
        store: &mut FileStore,
        history: &HistoryStore,
        steps: usize,
    ) -> Result<(), CadenceError> {
        let record = history.get(store)?;
        if record.len() < MIN_HISTORY_POINTS {
            return Err(CadenceError::InsufficientData {
                points: record.len(),
                required: MIN_HISTORY_POINTS,
            });
        }

        let timestamps: Vec<EpochMs> = record.iter().map(|entry| entry.datetime_utc).collect();
        let predicted = self.forecaster.forecast_timestamps(&timestamps, steps)?;
        store.save(&self.path, &predicted)
    }

    /// All persisted prediction entries; empty when none were ever
    /// generated.
    pub fn get_all(&self, store: &mut FileStore) -> Result<Vec<PredictionEntry>, CadenceError> {
        Ok(store.load(&self.path, true)?.unwrap_or_default())
    }

    /// Predictions strictly after `reference_time`, sorted ascending.
    pub fn get_future(
        &self,
        store: &mut FileStore,
        reference_time: EpochMs,
    ) -> Result<Vec<PredictionEntry>, CadenceError> {
        let mut future: Vec<PredictionEntry> = self
            .get_all(store)?
            .into_iter()
            .filter(|entry| entry.datetime_utc > reference_time)
            .collect();
        future.sort_by_key(|entry| entry.datetime_utc);
        Ok(future)
    }
}

// ─── Tests ────────────────────────────────────────────────────────
