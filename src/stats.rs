//! Per-page and cumulative run statistics, and the progress snapshot.
//!
//! [`PageStats`] is produced fresh for every page and handed back to the
//! orchestrator by value. [`RunStats`] accumulates those records and is
//! written to the progress file after each page so the run can be watched
//! from outside.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{CatalogError, EntryOutcome};

/// Counters for one listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageStats {
    pub downloaded: u64,
    pub errors: u64,
    pub skipped: u64,
}

impl PageStats {
    /// Record returned when the page itself could not be processed.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            errors: 1,
            ..Self::default()
        }
    }

    /// Folds one entry outcome into the counters. Ignored entries do not count.
    pub fn record(&mut self, outcome: &EntryOutcome) {
        match outcome {
            EntryOutcome::Downloaded { .. } => self.downloaded += 1,
            EntryOutcome::Skipped => self.skipped += 1,
            EntryOutcome::Failed(_) => self.errors += 1,
            EntryOutcome::Ignored(_) => {}
        }
    }

    /// Sum of all counted entries.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.downloaded + self.errors + self.skipped
    }
}

/// Cumulative counters for a run. Never reset, only added to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub downloaded: u64,
    pub errors: u64,
    pub skipped: u64,
    pub processed_pages: u64,
}

impl RunStats {
    /// Adds a completed page's counters and counts the page as processed.
    pub fn absorb(&mut self, page: PageStats) {
        self.downloaded += page.downloaded;
        self.errors += page.errors;
        self.skipped += page.skipped;
        self.processed_pages += 1;
    }
}

/// Overwrites `path` with the JSON form of `stats`.
///
/// The snapshot is written to a sibling temporary file and renamed into place
/// so a reader never observes a half-written file.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the snapshot cannot be written.
pub async fn persist_progress(path: &Path, stats: &RunStats) -> Result<(), CatalogError> {
    let json = serde_json::to_vec(stats).map_err(|e| CatalogError::io(path, e.into()))?;
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_name);

    tokio::fs::write(&tmp_path, &json)
        .await
        .map_err(|e| CatalogError::io(&tmp_path, e))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    debug!(path = %path.display(), processed_pages = stats.processed_pages, "progress saved");
    Ok(())
}

/// Reads a progress snapshot written by [`persist_progress`].
///
/// # Errors
///
/// Returns [`CatalogError::Io`] if the file is missing or not valid JSON.
pub async fn load_progress(path: &Path) -> Result<RunStats, CatalogError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::io(path, e.into()))
}
