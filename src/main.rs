//! CLI entry point for the catalog downloader.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Result;
use catalog_downloader::Orchestrator;
use catalog_downloader::logging;
use clap::Parser;
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    let config = args.to_config()?;

    logging::init_tracing(logging::console_level(args.verbose, args.quiet), &config.log_file)?;

    debug!(?args, "CLI arguments parsed");
    info!(
        cwd = %std::env::current_dir().map(|d| d.display().to_string()).unwrap_or_default(),
        catalog = %config.base_url,
        "Catalog downloader starting"
    );

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_signal = Arc::clone(&interrupted);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received, stopping after the current page");
            interrupted_signal.store(true, Ordering::SeqCst);
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("second interrupt, exiting immediately");
                std::process::exit(130);
            }
        }
    });

    let summary = Orchestrator::new(config, interrupted).run().await?;

    info!(
        downloaded = summary.stats.downloaded,
        errors = summary.stats.errors,
        skipped = summary.stats.skipped,
        interrupted = summary.interrupted,
        "Run complete"
    );

    Ok(())
}
