//! Raw listing snapshots kept for post-hoc inspection.
//!
//! Each fetched listing page is written verbatim to
//! `<debug_dir>/page_<index>.html`. Snapshots are diagnostic only: callers log
//! a failure and carry on.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::catalog::CatalogError;

/// Path of the snapshot for listing page `index`.
#[must_use]
pub fn snapshot_path(debug_dir: &Path, index: u32) -> PathBuf {
    debug_dir.join(format!("page_{index}.html"))
}

/// Writes `body` as the snapshot of page `index`, creating `debug_dir` if
/// needed and replacing any earlier snapshot of the same page.
///
/// # Errors
///
/// Returns [`CatalogError::Io`] when the directory or file cannot be written.
pub async fn save_page_snapshot(
    debug_dir: &Path,
    index: u32,
    body: &str,
) -> Result<PathBuf, CatalogError> {
    tokio::fs::create_dir_all(debug_dir)
        .await
        .map_err(|e| CatalogError::io(debug_dir, e))?;
    let path = snapshot_path(debug_dir, index);
    tokio::fs::write(&path, body)
        .await
        .map_err(|e| CatalogError::io(&path, e))?;
    debug!(page = index, path = %path.display(), "saved page snapshot");
    Ok(path)
}
