//! Stable state reconciler: the two-phase state machine persisted to
//! `stable.json`.
//!
//! The reference time is captured once at construction; every
//! comparison in a run uses that one value.

use std::path::PathBuf;

use cadence_core::reconcile;
use cadence_core::types::{CadenceError, EpochMs, StableState};

use crate::history::HistoryStore;
use crate::predictions::PredictionStore;
use crate::store::FileStore;

#[derive(Debug, Clone)]
pub struct StableReconciler {
    path: PathBuf,
    reference_time: EpochMs,
}

impl StableReconciler {
    pub fn new(path: PathBuf, reference_time: EpochMs) -> Self {
        Self {
            path,
            reference_time,
        }
    }

    pub fn reference_time(&self) -> EpochMs {
        self.reference_time
    }

    fn load(&self, store: &mut FileStore) -> Result<StableState, CadenceError> {
        Ok(store.load(&self.path, true)?.unwrap_or_default())
    }

    /// Phase A: confirm and migrate the current event, promoting the
    /// nearest prediction when the slot is empty. The history append
    /// happens before the stable document is rewritten, so a failed
    /// append short-circuits the phase.
    pub fn advance_current(
        &self,
        store: &mut FileStore,
        history: &HistoryStore,
    ) -> Result<(), CadenceError> {
        let state = self.load(store)?;
        let outcome = reconcile::advance_current(state, self.reference_time);

        if let Some(timestamp) = outcome.confirm {
            history.append(store, timestamp)?;
        }
        store.save(&self.path, &outcome.state)
    }

    /// Phase B: refill the predicted window from the freshly generated
    /// forecast. A run with no future predictions leaves the document
    /// untouched.
    pub fn refill_predicted(
        &self,
        store: &mut FileStore,
        predictions: &PredictionStore,
        max_predictions: usize,
        min_gap_days: f64,
    ) -> Result<(), CadenceError> {
        let state = self.load(store)?;
        let future = predictions.get_future(store, self.reference_time)?;
        let outcome = reconcile::refill_predicted(state, &future, max_predictions, min_gap_days);

        if !outcome.changed {
            return Ok(());
        }
        store.save(&self.path, &outcome.state)
    }
}

// ─── Tests ────────────────────────────────────────────────────────
