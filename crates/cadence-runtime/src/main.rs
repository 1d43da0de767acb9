//! cadence: recurring-event forecast pipeline binary.
//!
//! Runs to completion: advance the current event, regenerate the
//! forecast, refill the predicted window, then exit. Non-zero exit
//! code on any failed phase.

use clap::Parser;

use cadence_runtime::{cli, pipeline};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    let filter = std::env::var("CADENCE_LOG")
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let reference_time = args
        .now
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());

    let mut pipeline = pipeline::Pipeline::new(&args.data_dir, args.settings(), reference_time)?;
    if let Err(err) = pipeline.run() {
        tracing::error!(error = %err, "pipeline failed");
        std::process::exit(1);
    }

    Ok(())
}
