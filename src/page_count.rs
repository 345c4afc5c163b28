//! Discovery of the number of listing pages.
//!
//! The first listing page is fetched once and an ordered list of
//! [`PageCountStrategy`] values is tried against it. A strategy whose marker
//! is absent hands over to the next one. A strategy whose marker is present
//! but unreadable ends detection with a single page, as does any transport
//! failure. The last strategy always yields.

use std::fmt;

use thiserror::Error;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::catalog::{CatalogClient, ListingDocument};
use crate::config::CrawlerConfig;
use crate::diagnostics;

/// Query parameter holding the page index in pagination links.
const INDEX_PARAM: &str = "index";

/// One way of reading the page count off the first listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCountStrategy {
    /// Second-to-last link of `ul.pagination`; the last one is "next".
    Pagination,
    /// Link labelled with the configured "last page" text.
    LastPageLink,
    /// Entry count: a full page suggests the configured fallback count,
    /// anything less means a single page.
    EntryCount,
}

/// A page-count marker was found on the page but could not be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageCountLookupError {
    /// The pagination control holds fewer than two links.
    #[error("pagination control has {links} link(s), expected at least two")]
    TooFewLinks { links: usize },

    /// The marker link has no `href`.
    #[error("{strategy} link has no href")]
    MissingHref { strategy: PageCountStrategy },

    /// The marker link has no positive numeric `index` query parameter.
    #[error("{strategy} link {href:?} carries no usable page index")]
    InvalidIndex {
        strategy: PageCountStrategy,
        href: String,
    },
}

impl PageCountStrategy {
    /// Strategies in the order they are tried.
    pub const ORDER: [Self; 3] = [Self::Pagination, Self::LastPageLink, Self::EntryCount];

    /// Applies the strategy to a parsed first page.
    ///
    /// `Ok(None)` means the strategy's marker is not on the page.
    ///
    /// # Errors
    ///
    /// Returns [`PageCountLookupError`] when the marker is present but its
    /// page index cannot be read.
    pub fn detect(
        self,
        doc: &ListingDocument,
        page_url: &Url,
        config: &CrawlerConfig,
    ) -> Result<Option<u32>, PageCountLookupError> {
        match self {
            Self::Pagination => {
                let Some(hrefs) = doc.pagination_hrefs() else {
                    return Ok(None);
                };
                let links = hrefs.len();
                let second_to_last = links
                    .checked_sub(2)
                    .and_then(|i| hrefs.get(i))
                    .ok_or(PageCountLookupError::TooFewLinks { links })?;
                self.read_index(second_to_last.as_deref(), page_url).map(Some)
            }
            Self::LastPageLink => match doc.labelled_link_href(&config.last_page_label) {
                Some(href) => self.read_index(href.as_deref(), page_url).map(Some),
                None => Ok(None),
            },
            Self::EntryCount => {
                let count = doc.entry_count();
                if u32::try_from(count).is_ok_and(|count| count == config.page_size) {
                    warn!(
                        entries = count,
                        fallback_pages = config.fallback_page_count,
                        "first page is full but unpaginated, assuming fallback page count"
                    );
                    Ok(Some(config.fallback_page_count.max(1)))
                } else {
                    Ok(Some(1))
                }
            }
        }
    }

    fn read_index(self, href: Option<&str>, page_url: &Url) -> Result<u32, PageCountLookupError> {
        let href = href.ok_or(PageCountLookupError::MissingHref { strategy: self })?;
        index_from_href(href, page_url).ok_or_else(|| PageCountLookupError::InvalidIndex {
            strategy: self,
            href: href.to_string(),
        })
    }
}

impl fmt::Display for PageCountStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pagination => "pagination",
            Self::LastPageLink => "last-page-link",
            Self::EntryCount => "entry-count",
        };
        f.write_str(name)
    }
}

/// Page count together with the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCountDetection {
    pub pages: u32,
    pub strategy: PageCountStrategy,
    /// Set when `strategy` found its marker but could not read it; `pages`
    /// is then 1.
    pub lookup_error: Option<PageCountLookupError>,
}

/// Reads the page count off first-page markup without touching the network.
///
/// `page_url` is the URL the markup was fetched from; relative pagination
/// links are resolved against it.
#[must_use]
pub fn detect_page_count(markup: &str, page_url: &Url, config: &CrawlerConfig) -> PageCountDetection {
    let doc = ListingDocument::parse(markup);
    for strategy in PageCountStrategy::ORDER {
        match strategy.detect(&doc, page_url, config) {
            Ok(Some(pages)) => {
                return PageCountDetection {
                    pages,
                    strategy,
                    lookup_error: None,
                };
            }
            Ok(None) => debug!(%strategy, "page count strategy found nothing"),
            Err(e) => {
                error!(%strategy, error = %e, "failed to read page count, assuming a single page");
                return PageCountDetection {
                    pages: 1,
                    strategy,
                    lookup_error: Some(e),
                };
            }
        }
    }
    PageCountDetection {
        pages: 1,
        strategy: PageCountStrategy::EntryCount,
        lookup_error: None,
    }
}

/// Determines how many listing pages the catalog has.
///
/// Never fails: a transport error or an unreadable page-count marker is
/// logged and treated as a one-page catalog. The first page body is saved as the page 1 snapshot.
pub async fn resolve_total_pages(client: &CatalogClient, config: &CrawlerConfig) -> u32 {
    info!("determining total page count");
    let page_url = match config.page_url(1) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "cannot build first page URL, assuming a single page");
            return 1;
        }
    };

    let markup = match client.fetch_page(&page_url).await {
        Ok(markup) => markup,
        Err(e) => {
            error!(error = %e, "failed to determine page count, assuming a single page");
            return 1;
        }
    };

    if let Err(e) = diagnostics::save_page_snapshot(&config.debug_dir, 1, &markup).await {
        warn!(error = %e, "failed to save first page snapshot");
    }

    let detection = detect_page_count(&markup, &page_url, config);
    info!(
        pages = detection.pages,
        strategy = %detection.strategy,
        "page count determined"
    );
    detection.pages
}

/// Reads the `index` query parameter of `href`, resolved against `page_url`.
/// Zero is not a page index and yields `None`.
fn index_from_href(href: &str, page_url: &Url) -> Option<u32> {
    let url = page_url.join(href).ok()?;
    url.query_pairs()
        .find(|(key, _)| key == INDEX_PARAM)
        .and_then(|(_, value)| value.trim().parse::<u32>().ok())
        .filter(|index| *index > 0)
}
