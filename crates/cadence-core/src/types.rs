use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Time ─────────────────────────────────────────────────────────

/// Timestamp in milliseconds since the Unix epoch (the wire format of
/// every persisted document).
pub type EpochMs = i64;

/// Milliseconds per day, used when converting gaps to fractional days.
pub const MS_PER_DAY: i64 = 24 * 3600 * 1000;

/// Convert a millisecond span to fractional days.
pub fn ms_to_days(ms: i64) -> f64 {
    ms as f64 / MS_PER_DAY as f64
}

/// Convert fractional days to a rounded millisecond span.
pub fn days_to_ms(days: f64) -> i64 {
    (days * MS_PER_DAY as f64).round() as i64
}

// ─── Persisted documents ──────────────────────────────────────────

/// One confirmed occurrence in `history.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub datetime_utc: EpochMs,
}

/// One forecast occurrence in `predicted.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionEntry {
    pub datetime_utc: EpochMs,
    pub predicted: bool,
}

impl PredictionEntry {
    pub fn new(datetime_utc: EpochMs) -> Self {
        Self {
            datetime_utc,
            predicted: true,
        }
    }
}

/// The event presently considered active in `stable.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableEvent {
    pub datetime_utc: EpochMs,
    #[serde(default)]
    pub predicted: bool,
}

impl From<PredictionEntry> for StableEvent {
    fn from(entry: PredictionEntry) -> Self {
        Self {
            datetime_utc: entry.datetime_utc,
            predicted: entry.predicted,
        }
    }
}

/// The `stable.json` document: at most one active event plus the
/// upcoming prediction window (soonest first).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableState {
    /// Serialized as `{}` when no event is active (wire compatibility
    /// with pre-existing documents).
    #[serde(default, with = "current_slot")]
    pub current: Option<StableEvent>,
    #[serde(default)]
    pub predicted: Vec<PredictionEntry>,
}

/// Serde adapter mapping `current: {}` ↔ `None`.
mod current_slot {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::StableEvent;

    #[derive(Serialize, Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Event(StableEvent),
        Empty {},
    }

    pub fn serialize<S: Serializer>(
        value: &Option<StableEvent>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(event) => Repr::Event(*event).serialize(serializer),
            None => Repr::Empty {}.serialize(serializer),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<StableEvent>, D::Error> {
        match Repr::deserialize(deserializer)? {
            Repr::Event(event) => Ok(Some(event)),
            Repr::Empty {} => Ok(None),
        }
    }
}

// ─── Error ────────────────────────────────────────────────────────

/// Failure taxonomy for a pipeline run. Every variant is recoverable
/// in the sense that the next scheduled run simply retries; the run
/// that observes one stops at the failing phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CadenceError {
    #[error("insufficient history: {points} points, need at least {required}")]
    InsufficientData { points: usize, required: usize },

    #[error("model fit failed: {0}")]
    ModelFit(String),

    #[error("persistence failure on {path}: {detail}")]
    Persistence { path: PathBuf, detail: String },
}

// ─── Tests ────────────────────────────────────────────────────────
