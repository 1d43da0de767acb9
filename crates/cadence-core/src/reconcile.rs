//! Reconciliation rules for the stable state.
//!
//! Pure state transitions over [`StableState`]; persistence and the
//! history append happen in the runtime crate. Every rule takes the
//! run's reference time as a parameter so a whole run compares against
//! one consistent clock reading.

use crate::types::{EpochMs, MS_PER_DAY, PredictionEntry, StableState};

/// Default size of the stable predicted window.
pub const DEFAULT_MAX_PREDICTIONS: usize = 5;

/// Default minimum gap (days) between the current event and the first
/// refill candidate before near-duplicate suppression applies.
pub const DEFAULT_MIN_GAP_DAYS: f64 = 3.0;

// ─── Phase A: advance current ─────────────────────────────────────

/// Result of [`advance_current`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceOutcome {
    pub state: StableState,
    /// Timestamp to confirm into history, when the current event was
    /// non-predicted. Emitted on every run the event is observed, not
    /// just on expiry; the history append is idempotent against this.
    pub confirm: Option<EpochMs>,
}

/// Migrate an expired current event out and promote the nearest
/// predicted event when no current event remains.
pub fn advance_current(mut state: StableState, reference_time: EpochMs) -> AdvanceOutcome {
    let mut confirm = None;

    if let Some(current) = state.current {
        if !current.predicted {
            confirm = Some(current.datetime_utc);
        }
        if current.datetime_utc < reference_time {
            state.current = None;
        }
    }

    if state.current.is_none() && !state.predicted.is_empty() {
        let head = state.predicted.remove(0);
        state.current = Some(head.into());
    }

    AdvanceOutcome { state, confirm }
}

// ─── Phase B: refill predicted ────────────────────────────────────

/// Result of [`refill_predicted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefillOutcome {
    pub state: StableState,
    /// False when no future predictions existed and the state was left
    /// untouched (callers skip the rewrite).
    pub changed: bool,
}

/// Refill the predicted window from the future predictions, soonest
/// first, applying near-duplicate suppression against the current
/// event.
///
/// `future` must already be filtered to timestamps after the reference
/// time and sorted ascending. The earliest candidate is skipped when it
/// falls within `min_gap_days` of the current event, but only when
/// enough surplus predictions exist to keep the window at
/// `max_predictions`.
pub fn refill_predicted(
    mut state: StableState,
    future: &[PredictionEntry],
    max_predictions: usize,
    min_gap_days: f64,
) -> RefillOutcome {
    if future.is_empty() {
        return RefillOutcome {
            state,
            changed: false,
        };
    }

    let mut skip = 0;
    if let Some(current) = state.current {
        let gap_days = (future[0].datetime_utc - current.datetime_utc) as f64 / MS_PER_DAY as f64;
        if gap_days < min_gap_days && future.len() > max_predictions {
            skip = 1;
        }
    }

    state.predicted = future
        .iter()
        .skip(skip)
        .take(max_predictions)
        .copied()
        .collect();

    RefillOutcome {
        state,
        changed: true,
    }
}

// ─── Tests ────────────────────────────────────────────────────────
