//! Run configuration for the catalog crawler.
//!
//! Every tunable of a run lives in [`CrawlerConfig`], which is built once in
//! `main` and passed by reference into each component. The defaults are the
//! reference values for the presidential documents block of the official
//! publication portal.

use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::catalog::CatalogError;

/// Catalog host.
pub const DEFAULT_BASE_URL: &str = "http://publication.pravo.gov.ru";

/// Path of the paginated listing, relative to the base URL.
pub const CATALOG_PATH: &str = "/documents/block/president";

/// Number of entries requested per listing page.
pub const PAGE_SIZE: u32 = 200;

/// Page count assumed when the first page is full but no pagination markers
/// are present. Tied to the catalog size observed when the tool was written;
/// it goes stale as the catalog grows, hence overridable.
pub const DEFAULT_FALLBACK_PAGE_COUNT: u32 = 87;

/// Connect and per-read timeout; the whole transfer is unbounded.
pub const REQUEST_TIMEOUT_SECS: u64 = 45;

/// Pause before each document entry.
pub const ENTRY_DELAY_MS: u64 = 500;

/// Pause between listing pages.
pub const PAGE_DELAY_MS: u64 = 3000;

/// Visible text of the "last page" link.
pub const LAST_PAGE_LABEL: &str = "Последняя";

/// Extension used when the file URL does not carry one.
pub const DEFAULT_EXTENSION: &str = "pdf";

/// Browser User-Agent sent on every request.
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Accept header sent on every request.
pub const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

/// Accept-Language header sent on every request.
pub const BROWSER_ACCEPT_LANGUAGE: &str = "ru-RU,ru;q=0.8,en-US;q=0.5,en;q=0.3";

/// Configuration for one crawl run.
#[derive(Debug, Clone)]
pub struct CrawlerConfig {
    /// Catalog host; file links are resolved against it.
    pub base_url: Url,
    /// Listing path appended to `base_url`.
    pub catalog_path: String,
    /// Entries per listing page.
    pub page_size: u32,
    /// Page count guessed when the first page is full and unpaginated.
    pub fallback_page_count: u32,
    /// Connect and per-read timeout applied to every request.
    pub request_timeout: Duration,
    /// Pause before each entry.
    pub entry_delay: Duration,
    /// Pause between pages.
    pub page_delay: Duration,
    /// Directory receiving downloaded files.
    pub output_dir: PathBuf,
    /// Directory receiving raw listing markup.
    pub debug_dir: PathBuf,
    /// Plain-text log file.
    pub log_file: PathBuf,
    /// JSON progress snapshot, overwritten after every page.
    pub progress_file: PathBuf,
    /// Text of the "last page" pagination link.
    pub last_page_label: String,
    /// Extension for file URLs that do not carry one.
    pub default_extension: String,
    /// Header set identifying the session as a browser.
    pub headers: BrowserHeaders,
}

/// Identification headers installed on the shared session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowserHeaders {
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
}

impl Default for BrowserHeaders {
    fn default() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            accept: BROWSER_ACCEPT.to_string(),
            accept_language: BROWSER_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

impl Default for CrawlerConfig {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        Self::with_base_url(Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"))
    }
}

impl CrawlerConfig {
    /// Reference configuration pointed at a different catalog host.
    #[must_use]
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            catalog_path: CATALOG_PATH.to_string(),
            page_size: PAGE_SIZE,
            fallback_page_count: DEFAULT_FALLBACK_PAGE_COUNT,
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            entry_delay: Duration::from_millis(ENTRY_DELAY_MS),
            page_delay: Duration::from_millis(PAGE_DELAY_MS),
            output_dir: PathBuf::from("pdfs"),
            debug_dir: PathBuf::from("debug_responses"),
            log_file: PathBuf::from("download.log"),
            progress_file: PathBuf::from("progress.json"),
            last_page_label: LAST_PAGE_LABEL.to_string(),
            default_extension: DEFAULT_EXTENSION.to_string(),
            headers: BrowserHeaders::default(),
        }
    }

    /// Parses `base_url` and returns the reference configuration for it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] when `base_url` is not an absolute URL.
    pub fn for_base_url(base_url: &str) -> Result<Self, CatalogError> {
        let parsed = Url::parse(base_url).map_err(|_| CatalogError::invalid_url(base_url))?;
        Ok(Self::with_base_url(parsed))
    }

    /// URL of the listing page `index` (1-based) at the configured page size.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] if the catalog path cannot be
    /// joined onto the base URL.
    pub fn page_url(&self, index: u32) -> Result<Url, CatalogError> {
        let mut url = self
            .base_url
            .join(&self.catalog_path)
            .map_err(|_| CatalogError::invalid_url(format!("{}{}", self.base_url, self.catalog_path)))?;
        url.query_pairs_mut()
            .append_pair("index", &index.to_string())
            .append_pair("pageSize", &self.page_size.to_string());
        Ok(url)
    }

    /// Removes every configured pause. Used by tests and dry local runs.
    #[must_use]
    pub fn without_delays(mut self) -> Self {
        self.entry_delay = Duration::ZERO;
        self.page_delay = Duration::ZERO;
        self
    }
}
