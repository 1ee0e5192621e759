//! cycledash daemon
//!
//! Polls the snapshot source and serves the rendered dashboard until
//! Ctrl+C or SIGTERM.

use anyhow::Context;
use clap::Parser;
use cycledash::api::{self, AppState};
use cycledash::config::Config;
use cycledash::dashboard::DashboardController;
use cycledash::display::SharedView;
use cycledash::fetch::SnapshotSource;
use cycledash::poller::Poller;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "cycledash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Poll a glucose/cycle snapshot and render the dashboard")]
struct Args {
    /// Config file (default: search standard locations)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    cycledash::logging::init(&config.logging).context("Failed to initialize logging")?;

    tracing::info!("cycledash v{}", env!("CARGO_PKG_VERSION"));

    let source = config
        .source
        .build()
        .context("Invalid snapshot source configuration")?;
    tracing::info!("Snapshot source: {}", source.describe());

    let view = SharedView::new();
    let controller = DashboardController::new(Arc::new(view.clone()))
        .label_zone(config.dashboard.label_timezone);
    let poller = Arc::new(Poller::new(source, controller, (&config.poller).into()));

    let mut poll_handle = Arc::clone(&poller).start();

    if config.api.enabled {
        let state = AppState::new(view, Arc::clone(&poller));
        api::serve(state, &config.api).await?;
    } else {
        api::shutdown_signal().await;
    }

    tracing::info!("Shutting down...");
    poller.stop();
    match tokio::time::timeout(Duration::from_secs(5), &mut poll_handle).await {
        Ok(joined) => joined?,
        Err(_) => {
            tracing::warn!("Poller did not stop in time, aborting");
            poll_handle.abort();
        }
    }

    tracing::info!("cycledash shutdown complete");
    Ok(())
}
