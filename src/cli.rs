//! CLI argument definitions using clap derive macros.
//!
//! Every flag is optional; with no arguments the run uses the reference
//! configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use catalog_downloader::CrawlerConfig;
use catalog_downloader::catalog::CatalogError;
use catalog_downloader::config::{
    DEFAULT_BASE_URL, DEFAULT_FALLBACK_PAGE_COUNT, ENTRY_DELAY_MS, PAGE_DELAY_MS,
    REQUEST_TIMEOUT_SECS,
};

/// Crawl the paginated document catalog and download every referenced file.
#[derive(Parser, Debug)]
#[command(name = "catalog-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error console output (the log file is unaffected)
    #[arg(short, long)]
    pub quiet: bool,

    /// Catalog host
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory receiving downloaded files
    #[arg(short, long, default_value = "pdfs")]
    pub output_dir: PathBuf,

    /// Directory receiving raw listing snapshots
    #[arg(long, default_value = "debug_responses")]
    pub debug_dir: PathBuf,

    /// Plain-text log file
    #[arg(long, default_value = "download.log")]
    pub log_file: PathBuf,

    /// Progress snapshot, overwritten after every page
    #[arg(long, default_value = "progress.json")]
    pub progress_file: PathBuf,

    /// Page count assumed when the first page is full but unpaginated
    #[arg(long, default_value_t = DEFAULT_FALLBACK_PAGE_COUNT, value_parser = clap::value_parser!(u32).range(1..))]
    pub fallback_pages: u32,

    /// Pause before each document in milliseconds
    #[arg(long, default_value_t = ENTRY_DELAY_MS)]
    pub entry_delay_ms: u64,

    /// Pause between listing pages in milliseconds
    #[arg(long, default_value_t = PAGE_DELAY_MS)]
    pub page_delay_ms: u64,

    /// Connect and per-read timeout in seconds
    #[arg(long, default_value_t = REQUEST_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=600))]
    pub timeout_secs: u64,
}

impl Args {
    /// Builds the run configuration from the parsed flags.
    pub fn to_config(&self) -> Result<CrawlerConfig, CatalogError> {
        let mut config = CrawlerConfig::for_base_url(&self.base_url)?;
        config.output_dir.clone_from(&self.output_dir);
        config.debug_dir.clone_from(&self.debug_dir);
        config.log_file.clone_from(&self.log_file);
        config.progress_file.clone_from(&self.progress_file);
        config.fallback_page_count = self.fallback_pages;
        config.entry_delay = Duration::from_millis(self.entry_delay_ms);
        config.page_delay = Duration::from_millis(self.page_delay_ms);
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_no_args_gives_reference_config() {
        let args = Args::try_parse_from(["catalog-downloader"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);

        let config = args.to_config().unwrap();
        let reference = CrawlerConfig::default();
        assert_eq!(config.base_url, reference.base_url);
        assert_eq!(config.output_dir, reference.output_dir);
        assert_eq!(config.fallback_page_count, 87);
        assert_eq!(config.entry_delay, reference.entry_delay);
        assert_eq!(config.page_delay, reference.page_delay);
        assert_eq!(config.request_timeout, reference.request_timeout);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["catalog-downloader", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_overrides_reach_config() {
        let args = Args::try_parse_from([
            "catalog-downloader",
            "-o",
            "/tmp/out",
            "--fallback-pages",
            "120",
            "--page-delay-ms",
            "0",
            "--timeout-secs",
            "5",
        ])
        .unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.fallback_page_count, 120);
        assert_eq!(config.page_delay, Duration::ZERO);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_cli_zero_fallback_pages_rejected() {
        let result = Args::try_parse_from(["catalog-downloader", "--fallback-pages", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_invalid_base_url_fails_config() {
        let args = Args::try_parse_from(["catalog-downloader", "--base-url", "not a url"]).unwrap();
        assert!(matches!(args.to_config(), Err(CatalogError::InvalidUrl { .. })));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let err = Args::try_parse_from(["catalog-downloader", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
