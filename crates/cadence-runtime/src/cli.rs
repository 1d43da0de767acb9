//! CLI definition using clap derive.

use std::path::PathBuf;

use clap::Parser;

use crate::pipeline::PipelineSettings;

#[derive(Parser)]
#[command(name = "cadence", about = "recurring-event forecast pipeline")]
pub struct Cli {
    /// Data directory holding history.json, predicted.json and stable.json
    #[arg(long, default_value = "./data")]
    pub data_dir: PathBuf,

    /// Number of future intervals to forecast per run
    #[arg(long, default_value = "10")]
    pub steps: usize,

    /// Maximum entries kept in the stable predicted window
    #[arg(long, default_value = "5")]
    pub max_predictions: usize,

    /// Minimum gap (days) between the current event and the first refill
    /// candidate before the near-duplicate is skipped
    #[arg(long, default_value = "3")]
    pub min_gap_days: f64,

    /// Override the reference time for this run (epoch milliseconds)
    #[arg(long)]
    pub now: Option<i64>,
}

impl Cli {
    pub fn settings(&self) -> PipelineSettings {
        PipelineSettings {
            steps: self.steps,
            max_predictions: self.max_predictions,
            min_gap_days: self.min_gap_days,
        }
    }
}
