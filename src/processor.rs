//! Page processing: one listing page in, one [`PageStats`] record out.
//!
//! Failures are confined to the smallest scope that can absorb them. An
//! entry-level failure is counted and the next entry is processed; a
//! page-level failure becomes [`PageStats::failed`]. Nothing propagates to the
//! caller.

use tracing::{debug, error, info, instrument, warn};

use crate::catalog::{
    CatalogClient, CatalogEntry, CatalogError, EntryOutcome, IgnoreReason, RawEntry,
    extract_entries,
};
use crate::config::CrawlerConfig;
use crate::diagnostics;
use crate::stats::PageStats;

/// Fetches listing pages and downloads the files they reference.
#[derive(Debug)]
pub struct PageProcessor<'a> {
    client: &'a CatalogClient,
    config: &'a CrawlerConfig,
}

impl<'a> PageProcessor<'a> {
    #[must_use]
    pub fn new(client: &'a CatalogClient, config: &'a CrawlerConfig) -> Self {
        Self { client, config }
    }

    /// Processes listing page `index` and returns its counters.
    ///
    /// Always returns a well-formed record; a page that cannot be fetched
    /// yields `{downloaded: 0, errors: 1, skipped: 0}`.
    #[instrument(level = "debug", skip(self))]
    pub async fn process_page(&self, index: u32) -> PageStats {
        info!(page = index, "starting page");
        match self.try_process_page(index).await {
            Ok(stats) => {
                info!(
                    page = index,
                    entries = stats.total(),
                    downloaded = stats.downloaded,
                    errors = stats.errors,
                    skipped = stats.skipped,
                    "page finished"
                );
                stats
            }
            Err(e) => {
                error!(page = index, error = %e, "critical: page could not be processed");
                PageStats::failed()
            }
        }
    }

    async fn try_process_page(&self, index: u32) -> Result<PageStats, CatalogError> {
        let page_url = self.config.page_url(index)?;
        let markup = self.client.fetch_page(&page_url).await?;

        if let Err(e) = diagnostics::save_page_snapshot(&self.config.debug_dir, index, &markup).await
        {
            warn!(page = index, error = %e, "failed to save page snapshot");
        }

        let entries = extract_entries(&markup);
        if entries.is_empty() {
            warn!(page = index, "page has no documents");
            return Ok(PageStats::default());
        }
        debug!(page = index, entries = entries.len(), "extracted document blocks");

        let mut stats = PageStats::default();
        for raw in entries {
            tokio::time::sleep(self.config.entry_delay).await;
            let outcome = self.process_entry(raw).await;
            log_outcome(&outcome);
            stats.record(&outcome);
        }
        Ok(stats)
    }

    /// Handles one document block: validate, skip when present, else download.
    pub async fn process_entry(&self, raw: RawEntry) -> EntryOutcome {
        let Some(identifier) = raw.identifier else {
            return EntryOutcome::Ignored(IgnoreReason::MissingIdentifier);
        };
        let Some(href) = raw.href else {
            return EntryOutcome::Ignored(IgnoreReason::MissingLink { identifier });
        };

        let entry = match CatalogEntry::resolve(
            &identifier,
            &href,
            &self.config.base_url,
            &self.config.output_dir,
            &self.config.default_extension,
        ) {
            Ok(entry) => entry,
            Err(e) => return EntryOutcome::Failed(e),
        };

        match tokio::fs::try_exists(&entry.path).await {
            Ok(true) => {
                debug!(identifier = %entry.identifier, "already on disk, skipping");
                return EntryOutcome::Skipped;
            }
            Ok(false) => {}
            Err(e) => return EntryOutcome::Failed(CatalogError::io(&entry.path, e)),
        }

        match self.client.download_to_file(&entry.file_url, &entry.path).await {
            Ok(bytes) => {
                info!(identifier = %entry.identifier, bytes, "downloaded");
                EntryOutcome::Downloaded { bytes }
            }
            Err(e) => EntryOutcome::Failed(e),
        }
    }
}

fn log_outcome(outcome: &EntryOutcome) {
    match outcome {
        EntryOutcome::Ignored(reason) => debug!(%reason, "entry ignored"),
        EntryOutcome::Failed(e) => match e.status() {
            Some(status) => error!(status, error = %e, "file download failed"),
            None => error!(error = %e, "entry failed"),
        },
        EntryOutcome::Downloaded { .. } | EntryOutcome::Skipped => {}
    }
}
