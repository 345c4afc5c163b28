//! Markup extraction for catalog listing pages.
//!
//! A listing page holds one `div.infoindocumentlist` block per document. Each
//! block carries the publication number in `span.info-data` and the file link
//! in `a.documents-item-file`. Pagination is a `ul.pagination` list whose last
//! link is the "next" control.
//!
//! `scraper::Html` is not `Send`, so callers parse, extract owned values and
//! drop the document before the next `.await`.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// Selector of one document block.
pub const ENTRY_SELECTOR: &str = "div.infoindocumentlist";
/// Selector of the publication number inside a block.
pub const IDENTIFIER_SELECTOR: &str = "span.info-data";
/// Selector of the file link inside a block.
pub const FILE_LINK_SELECTOR: &str = "a.documents-item-file";
/// Selector of the pagination control.
pub const PAGINATION_SELECTOR: &str = "ul.pagination";

#[allow(clippy::expect_used)]
fn compile(selector: &str) -> Selector {
    Selector::parse(selector).expect("static selector is valid")
}

static ENTRY: LazyLock<Selector> = LazyLock::new(|| compile(ENTRY_SELECTOR));
static IDENTIFIER: LazyLock<Selector> = LazyLock::new(|| compile(IDENTIFIER_SELECTOR));
static FILE_LINK: LazyLock<Selector> = LazyLock::new(|| compile(FILE_LINK_SELECTOR));
static PAGINATION: LazyLock<Selector> = LazyLock::new(|| compile(PAGINATION_SELECTOR));
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| compile("a"));

/// Values pulled out of one document block, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawEntry {
    /// Trimmed publication number; `None` when missing or blank.
    pub identifier: Option<String>,
    /// File link as written in the markup; `None` when missing or blank.
    pub href: Option<String>,
}

/// A parsed listing page.
#[derive(Debug)]
pub struct ListingDocument {
    html: Html,
}

impl ListingDocument {
    /// Parses a listing page. HTML parsing is lenient and never fails.
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Document blocks in document order.
    #[must_use]
    pub fn entries(&self) -> Vec<RawEntry> {
        self.html.select(&ENTRY).map(raw_entry).collect()
    }

    /// Number of document blocks on the page.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.html.select(&ENTRY).count()
    }

    /// `href` of every link inside the first pagination control, in order.
    ///
    /// Returns `None` when the page has no pagination control. Links without
    /// an `href` keep their position as `None`.
    #[must_use]
    pub fn pagination_hrefs(&self) -> Option<Vec<Option<String>>> {
        let pagination = self.html.select(&PAGINATION).next()?;
        Some(
            pagination
                .select(&ANCHOR)
                .map(|link| link.value().attr("href").map(str::to_string))
                .collect(),
        )
    }

    /// `href` of the first link whose visible text equals `label`.
    ///
    /// The outer `Option` reports whether such a link exists at all.
    #[must_use]
    pub fn labelled_link_href(&self, label: &str) -> Option<Option<String>> {
        self.html
            .select(&ANCHOR)
            .find(|link| element_text(link) == label)
            .map(|link| link.value().attr("href").map(str::to_string))
    }
}

fn raw_entry(block: ElementRef<'_>) -> RawEntry {
    let identifier = block
        .select(&IDENTIFIER)
        .next()
        .map(|span| element_text(&span))
        .filter(|text| !text.is_empty());
    let href = block
        .select(&FILE_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .map(str::to_string);
    RawEntry { identifier, href }
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts every document block from `markup`.
#[must_use]
pub fn extract_entries(markup: &str) -> Vec<RawEntry> {
    ListingDocument::parse(markup).entries()
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="infoindocumentlist">
            <span class="info-data"> 0001202401150001 </span>
            <a class="documents-item-file" href="/file/pdf?eoNumber=0001202401150001">PDF</a>
          </div>
          <div class="infoindocumentlist">
            <a class="documents-item-file" href="/file/pdf?eoNumber=unknown">PDF</a>
          </div>
          <div class="infoindocumentlist">
            <span class="info-data">0001202401150003</span>
          </div>
          <div class="infoindocumentlist">
            <span class="info-data">0001202401150004</span>
            <a class="documents-item-file">no href</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn test_extract_entries_preserves_document_order() {
        let entries = extract_entries(LISTING);
        assert_eq!(entries.len(), 4);
        assert_eq!(
            entries[0],
            RawEntry {
                identifier: Some("0001202401150001".to_string()),
                href: Some("/file/pdf?eoNumber=0001202401150001".to_string()),
            }
        );
    }

    #[test]
    fn test_extract_entries_reports_missing_parts() {
        let entries = extract_entries(LISTING);
        assert_eq!(entries[1].identifier, None);
        assert!(entries[1].href.is_some());
        assert_eq!(entries[2].href, None);
        assert_eq!(entries[3].identifier.as_deref(), Some("0001202401150004"));
        assert_eq!(entries[3].href, None);
    }

    #[test]
    fn test_blank_identifier_is_absent() {
        let entries = extract_entries(
            r#"<div class="infoindocumentlist"><span class="info-data">   </span>
               <a class="documents-item-file" href="/f">x</a></div>"#,
        );
        assert_eq!(entries[0].identifier, None);
    }

    #[test]
    fn test_page_without_blocks_has_no_entries() {
        let doc = ListingDocument::parse("<html><body><p>Ничего не найдено</p></body></html>");
        assert!(doc.entries().is_empty());
        assert_eq!(doc.entry_count(), 0);
        assert!(doc.pagination_hrefs().is_none());
    }

    #[test]
    fn test_pagination_hrefs_keep_positions() {
        let doc = ListingDocument::parse(
            r#"<ul class="pagination">
                 <li><a href="?index=1">1</a></li>
                 <li><a>…</a></li>
                 <li><a href="?index=12">12</a></li>
                 <li><a href="?index=2">»</a></li>
               </ul>"#,
        );
        let hrefs = doc.pagination_hrefs().unwrap_or_default();
        assert_eq!(
            hrefs,
            vec![
                Some("?index=1".to_string()),
                None,
                Some("?index=12".to_string()),
                Some("?index=2".to_string()),
            ]
        );
    }

    #[test]
    fn test_labelled_link_matches_trimmed_text() {
        let doc = ListingDocument::parse(
            r#"<a href="?index=2">Следующая</a><a href="?index=40"> Последняя </a>"#,
        );
        assert_eq!(
            doc.labelled_link_href("Последняя"),
            Some(Some("?index=40".to_string()))
        );
        assert_eq!(doc.labelled_link_href("Первая"), None);
    }
}
