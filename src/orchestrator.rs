//! The run loop: resolve the page count, process pages in order, persist
//! progress, summarize.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::catalog::{CatalogClient, PARTIAL_SUFFIX};
use crate::config::CrawlerConfig;
use crate::page_count::resolve_total_pages;
use crate::processor::PageProcessor;
use crate::stats::{RunStats, load_progress, persist_progress};

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Page count reported by the resolver.
    pub total_pages: u32,
    /// Cumulative counters.
    pub stats: RunStats,
    /// Entries present in the output directory after the run.
    pub files_on_disk: usize,
    /// Whether the loop stopped early on user request.
    pub interrupted: bool,
}

/// Drives a full crawl.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use std::sync::atomic::AtomicBool;
/// use catalog_downloader::{CrawlerConfig, Orchestrator};
///
/// # async fn example() -> anyhow::Result<()> {
/// let orchestrator = Orchestrator::new(CrawlerConfig::default(), Arc::new(AtomicBool::new(false)));
/// let summary = orchestrator.run().await?;
/// println!("{} downloaded", summary.stats.downloaded);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Orchestrator {
    config: CrawlerConfig,
    interrupted: Arc<AtomicBool>,
}

impl Orchestrator {
    /// `interrupted` is polled before each page; once set, no further page
    /// is started.
    #[must_use]
    pub fn new(config: CrawlerConfig, interrupted: Arc<AtomicBool>) -> Self {
        Self {
            config,
            interrupted,
        }
    }

    /// Runs the crawl to completion or until interrupted.
    ///
    /// # Errors
    ///
    /// Only setup can fail: creating the output directory or building the
    /// HTTP session. Everything after that is logged and absorbed.
    pub async fn run(&self) -> Result<RunSummary> {
        let config = &self.config;
        tokio::fs::create_dir_all(&config.output_dir)
            .await
            .with_context(|| {
                format!("failed to create output directory {}", config.output_dir.display())
            })?;
        info!(dir = %config.output_dir.display(), "output directory ready");

        if let Ok(previous) = load_progress(&config.progress_file).await {
            info!(
                processed_pages = previous.processed_pages,
                downloaded = previous.downloaded,
                "previous progress snapshot found; existing files will be skipped"
            );
        }

        let client = CatalogClient::new(config).context("failed to build HTTP session")?;

        let total_pages = resolve_total_pages(&client, config).await;
        info!(total_pages, "pages to process");

        let processor = PageProcessor::new(&client, config);
        let mut stats = RunStats::default();
        let mut interrupted = false;

        for page in 1..=total_pages {
            if self.interrupted.load(Ordering::SeqCst) {
                info!(page, "interrupted by user");
                interrupted = true;
                break;
            }

            let page_stats = processor.process_page(page).await;
            stats.absorb(page_stats);

            if let Err(e) = persist_progress(&config.progress_file, &stats).await {
                error!(page, error = %e, "failed to save progress snapshot");
            }

            if page < total_pages {
                tokio::time::sleep(config.page_delay).await;
            }
        }

        let files_on_disk = count_files(&config.output_dir).await;
        let summary = RunSummary {
            total_pages,
            stats,
            files_on_disk,
            interrupted,
        };
        log_summary(&summary);
        Ok(summary)
    }
}

/// Number of entries in `dir`, not counting unfinished `.part` downloads;
/// 0 if it cannot be read.
async fn count_files(dir: &Path) -> usize {
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list output directory");
            return 0;
        }
    };
    let mut count = 0;
    loop {
        match entries.next_entry().await {
            Ok(Some(entry)) => {
                if !entry.file_name().to_string_lossy().ends_with(PARTIAL_SUFFIX) {
                    count += 1;
                }
            }
            Ok(None) => break,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "error while listing output directory");
                break;
            }
        }
    }
    count
}

fn log_summary(summary: &RunSummary) {
    info!("final statistics");
    info!(
        "pages processed: {}/{}",
        summary.stats.processed_pages, summary.total_pages
    );
    info!("downloaded: {}", summary.stats.downloaded);
    info!("errors: {}", summary.stats.errors);
    info!("skipped: {}", summary.stats.skipped);
    info!("files in output directory: {}", summary.files_on_disk);
    if summary.interrupted {
        warn!("run was interrupted; run again to continue, existing files are skipped");
    }
}
