//! Catalog Downloader Core Library
//!
//! Crawls the paginated document listing of a public publication portal,
//! extracts the publication number and file link of every document and
//! downloads the files into a local directory, skipping those already
//! present.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration passed into every component
//! - [`catalog`] - HTTP session, markup extraction, entry handling
//! - [`page_count`] - Discovery of the number of listing pages
//! - [`processor`] - Processing of a single listing page
//! - [`orchestrator`] - The page loop and final summary
//! - [`stats`] - Page and run counters, progress snapshot
//! - [`diagnostics`] - Raw page snapshots
//! - [`logging`] - Console and file tracing setup

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod logging;
pub mod orchestrator;
pub mod page_count;
pub mod processor;
pub mod stats;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use catalog::{CatalogClient, CatalogEntry, CatalogError, EntryOutcome};
pub use config::CrawlerConfig;
pub use orchestrator::{Orchestrator, RunSummary};
pub use page_count::{
    PageCountDetection, PageCountLookupError, PageCountStrategy, detect_page_count, resolve_total_pages,
};
pub use processor::PageProcessor;
pub use stats::{PageStats, RunStats};
