//! End-to-end pipeline runs against a temporary data directory.

use cadence_core::types::{
    EpochMs, HistoryEntry, MS_PER_DAY, PredictionEntry, StableEvent, StableState,
};
use cadence_runtime::pipeline::{Pipeline, PipelineSettings};
use tempfile::TempDir;

const T0: EpochMs = 1_750_000_000_000;

fn write_history(dir: &TempDir, timestamps: &[EpochMs]) {
    let doc: Vec<HistoryEntry> = timestamps
        .iter()
        .map(|t| HistoryEntry { datetime_utc: *t })
        .collect();
    let json = serde_json::to_string_pretty(&doc).expect("serialize history");
    std::fs::write(dir.path().join("history.json"), json).expect("write history");
}

fn read_history(dir: &TempDir) -> Vec<HistoryEntry> {
    let raw = std::fs::read_to_string(dir.path().join("history.json")).expect("read history");
    serde_json::from_str(&raw).expect("parse history")
}

fn read_stable(dir: &TempDir) -> StableState {
    let raw = std::fs::read_to_string(dir.path().join("stable.json")).expect("read stable");
    serde_json::from_str(&raw).expect("parse stable")
}

fn read_predictions(dir: &TempDir) -> Vec<PredictionEntry> {
    let raw = std::fs::read_to_string(dir.path().join("predicted.json")).expect("read predicted");
    serde_json::from_str(&raw).expect("parse predicted")
}

fn run(dir: &TempDir, reference_time: EpochMs) {
    let mut pipeline = Pipeline::new(dir.path(), PipelineSettings::default(), reference_time)
        .expect("pipeline");
    pipeline.run().expect("run");
}

#[test]
fn daily_cadence_first_run_builds_window() {
    let dir = TempDir::new().expect("tempdir");
    // Five confirmed daily occurrences, the last one just before "now".
    let history: Vec<EpochMs> = (0..5).map(|i| T0 + i * MS_PER_DAY).collect();
    write_history(&dir, &history);

    let now = T0 + 4 * MS_PER_DAY + MS_PER_DAY / 2;
    run(&dir, now);

    // The forecast continues the daily cadence.
    let predictions = read_predictions(&dir);
    assert_eq!(predictions.len(), 10);
    for pair in predictions.windows(2) {
        assert!(pair[0].datetime_utc < pair[1].datetime_utc);
    }
    assert!(predictions[0].datetime_utc > now);

    // With no prior stable state there was nothing to promote in
    // phase A, so the window fills but current stays empty.
    let stable = read_stable(&dir);
    assert!(stable.current.is_none());
    assert_eq!(stable.predicted.len(), 5);
    for entry in &stable.predicted {
        assert!(entry.datetime_utc > now);
        assert!(entry.predicted);
    }
}

#[test]
fn second_run_promotes_queued_prediction() {
    let dir = TempDir::new().expect("tempdir");
    let history: Vec<EpochMs> = (0..5).map(|i| T0 + i * MS_PER_DAY).collect();
    write_history(&dir, &history);

    let now = T0 + 4 * MS_PER_DAY + MS_PER_DAY / 2;
    run(&dir, now);
    run(&dir, now);

    // The second run's phase A found an empty current slot and a
    // populated queue, so the soonest prediction became current.
    let stable = read_stable(&dir);
    let current = stable.current.expect("current promoted");
    assert!(current.predicted);
    assert!(current.datetime_utc > now);
    assert_eq!(stable.predicted.len(), 5);
    // History is untouched: a predicted current is never confirmed.
    assert_eq!(read_history(&dir).len(), 5);
}

#[test]
fn expired_confirmed_event_moves_to_history() {
    let dir = TempDir::new().expect("tempdir");
    let history: Vec<EpochMs> = (0..4).map(|i| T0 + i * MS_PER_DAY).collect();
    write_history(&dir, &history);

    // A confirmed (non-predicted) occurrence sits in the current slot,
    // already expired relative to this run.
    let t_current = T0 + 4 * MS_PER_DAY;
    let state = StableState {
        current: Some(StableEvent {
            datetime_utc: t_current,
            predicted: false,
        }),
        predicted: vec![],
    };
    let json = serde_json::to_string_pretty(&state).expect("serialize stable");
    std::fs::write(dir.path().join("stable.json"), json).expect("write stable");

    let now = t_current + MS_PER_DAY / 2;
    run(&dir, now);

    let record = read_history(&dir);
    assert_eq!(record.len(), 5);
    assert!(record.iter().any(|e| e.datetime_utc == t_current));
    assert!(read_stable(&dir).current.is_none());
}

#[test]
fn insufficient_history_fails_without_predictions() {
    let dir = TempDir::new().expect("tempdir");
    write_history(&dir, &[T0, T0 + MS_PER_DAY]);

    let mut pipeline = Pipeline::new(
        dir.path(),
        PipelineSettings::default(),
        T0 + 2 * MS_PER_DAY,
    )
    .expect("pipeline");

    let result = pipeline.run();
    assert!(result.is_err(), "two history points cannot fit the model");
    // The failing generate phase wrote nothing; phase A's stable
    // document from earlier in the run is intact.
    assert!(!dir.path().join("predicted.json").exists());
    assert!(dir.path().join("stable.json").exists());
}

#[test]
fn reruns_are_idempotent_for_a_fixed_reference_time() {
    let dir = TempDir::new().expect("tempdir");
    let history: Vec<EpochMs> = (0..6).map(|i| T0 + i * MS_PER_DAY).collect();
    write_history(&dir, &history);

    let now = T0 + 5 * MS_PER_DAY + MS_PER_DAY / 4;
    run(&dir, now);
    run(&dir, now);
    let after_two = read_stable(&dir);
    run(&dir, now);
    let after_three = read_stable(&dir);

    // Once the current slot is occupied and the window is full, further
    // runs at the same reference time reach a fixed point.
    assert_eq!(after_two, after_three);
    assert_eq!(read_history(&dir).len(), 6);
}
