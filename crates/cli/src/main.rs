mod cli;
mod output;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use coverkit_core::{load_layered_config, RunCoordinator, StopSignal};

use cli::Args;

/// Exit code when the run completed but some jobs failed.
const EXIT_JOB_FAILURES: i32 = 2;

#[tokio::main]
async fn main() {
    match run().await {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_JOB_FAILURES),
        Err(e) => {
            error!("Fatal error: {:#}", e);
            eprintln!("error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Returns whether every job finished without failure.
async fn run() -> Result<bool> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = args
        .config
        .clone()
        .or_else(|| std::env::var("COVERKIT_CONFIG").ok().map(PathBuf::from));
    if let Some(path) = &config_path {
        info!("Loading configuration from {:?}", path);
    }

    let config = load_layered_config(config_path.as_deref(), &args.overrides())
        .context("Failed to load configuration")?;

    let stop = StopSignal::new();
    let coordinator = RunCoordinator::new(config).with_stop_signal(stop.clone());

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, finishing in-flight jobs");
            stop.raise();
        }
    });

    let report = coordinator.execute().await.context("Run aborted")?;

    if args.json {
        println!(
            "{}",
            output::render_json(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", output::render_text(&report));
    }

    Ok(!report.has_failures())
}
