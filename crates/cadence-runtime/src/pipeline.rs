//! Pipeline orchestrator: Phase A → generate → Phase B.
//!
//! Each phase persists its result before the next begins, so a crash
//! between phases leaves a consistent, resumable set of documents. The
//! first failing phase stops the run; no retry, no rollback.

use std::path::Path;

use cadence_core::forecast::DEFAULT_STEPS;
use cadence_core::reconcile::{DEFAULT_MAX_PREDICTIONS, DEFAULT_MIN_GAP_DAYS};
use cadence_core::types::{CadenceError, EpochMs};

use crate::history::HistoryStore;
use crate::predictions::PredictionStore;
use crate::stable::StableReconciler;
use crate::store::FileStore;

/// Tunables for one run.
#[derive(Debug, Clone, Copy)]
pub struct PipelineSettings {
    pub steps: usize,
    pub max_predictions: usize,
    pub min_gap_days: f64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            steps: DEFAULT_STEPS,
            max_predictions: DEFAULT_MAX_PREDICTIONS,
            min_gap_days: DEFAULT_MIN_GAP_DAYS,
        }
    }
}

pub struct Pipeline {
    store: FileStore,
    history: HistoryStore,
    predictions: PredictionStore,
    reconciler: StableReconciler,
    settings: PipelineSettings,
}

impl Pipeline {
    /// Wire the services against `data_dir`, creating it if needed.
    /// `reference_time` is captured once by the caller and used for
    /// every comparison in this run.
    pub fn new(
        data_dir: &Path,
        settings: PipelineSettings,
        reference_time: EpochMs,
    ) -> Result<Self, CadenceError> {
        std::fs::create_dir_all(data_dir).map_err(|err| CadenceError::Persistence {
            path: data_dir.to_path_buf(),
            detail: err.to_string(),
        })?;

        Ok(Self {
            store: FileStore::new(),
            history: HistoryStore::new(data_dir.join("history.json")),
            predictions: PredictionStore::new(data_dir.join("predicted.json")),
            reconciler: StableReconciler::new(data_dir.join("stable.json"), reference_time),
            settings,
        })
    }

    /// Run all three phases. Stops at the first failure, leaving the
    /// output of completed phases intact on disk.
    pub fn run(&mut self) -> Result<(), CadenceError> {
        tracing::info!(
            reference_time = self.reconciler.reference_time(),
            "advancing current event"
        );
        self.reconciler
            .advance_current(&mut self.store, &self.history)?;

        tracing::info!(steps = self.settings.steps, "generating predictions");
        self.predictions
            .generate(&mut self.store, &self.history, self.settings.steps)?;

        tracing::info!(
            max_predictions = self.settings.max_predictions,
            "refilling predicted window"
        );
        self.reconciler.refill_predicted(
            &mut self.store,
            &self.predictions,
            self.settings.max_predictions,
            self.settings.min_gap_days,
        )?;

        tracing::info!("pipeline completed");
        Ok(())
    }
}
