//! Catalog access: the HTTP session, listing markup extraction and entry
//! handling.
//!
//! # Example
//!
//! ```no_run
//! use catalog_downloader::CrawlerConfig;
//! use catalog_downloader::catalog::{CatalogClient, extract_entries};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CrawlerConfig::default();
//! let client = CatalogClient::new(&config)?;
//! let markup = client.fetch_page(&config.page_url(1)?).await?;
//! for entry in extract_entries(&markup) {
//!     println!("{:?}", entry.identifier);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod entry;
mod error;
pub mod parser;

pub use client::{CatalogClient, PARTIAL_SUFFIX, WRITE_CHUNK_SIZE};
pub use entry::{CatalogEntry, EntryOutcome, IgnoreReason, document_file_name, file_extension};
pub use error::CatalogError;
pub use parser::{ListingDocument, RawEntry, extract_entries};
