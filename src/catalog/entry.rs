//! Catalog entries and their per-entry processing outcome.

use std::fmt;
use std::path::{Path, PathBuf};

use url::Url;

use super::error::CatalogError;

/// Longest extension taken from a file URL; anything longer is treated as
/// part of the name.
const MAX_EXTENSION_LEN: usize = 5;

/// One document of a listing page, validated and ready to download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Publication number; base name of the local file.
    pub identifier: String,
    /// Absolute file URL.
    pub file_url: Url,
    /// Target path inside the output directory.
    pub path: PathBuf,
}

impl CatalogEntry {
    /// Resolves `href` against `base_url` and derives the target path.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidUrl`] when `href` cannot be resolved and
    /// [`CatalogError::InvalidIdentifier`] when the identifier cannot be used
    /// as a file name.
    pub fn resolve(
        identifier: &str,
        href: &str,
        base_url: &Url,
        output_dir: &Path,
        default_extension: &str,
    ) -> Result<Self, CatalogError> {
        let file_url = base_url
            .join(href)
            .map_err(|_| CatalogError::invalid_url(href))?;
        let extension = file_extension(&file_url).unwrap_or_else(|| default_extension.to_string());
        let file_name = document_file_name(identifier, &extension)?;
        Ok(Self {
            identifier: identifier.to_string(),
            path: output_dir.join(file_name),
            file_url,
        })
    }
}

/// Builds `<identifier>.<extension>`, rejecting identifiers that would escape
/// the output directory or are not a single path component.
///
/// # Errors
///
/// Returns [`CatalogError::InvalidIdentifier`] for empty identifiers, `.` or
/// `..`, and identifiers containing path separators or control characters.
pub fn document_file_name(identifier: &str, extension: &str) -> Result<String, CatalogError> {
    let unusable = identifier.is_empty()
        || identifier == "."
        || identifier == ".."
        || identifier
            .chars()
            .any(|c| matches!(c, '/' | '\\') || c.is_control());
    if unusable {
        return Err(CatalogError::invalid_identifier(identifier));
    }
    Ok(format!("{identifier}.{extension}"))
}

/// Extension of the last path segment of `url`, lowercased, when it is short
/// and alphanumeric (`/files/decree.PDF` gives `pdf`; `/file/pdf` gives none).
#[must_use]
pub fn file_extension(url: &Url) -> Option<String> {
    let last = url.path_segments()?.next_back()?;
    let (stem, ext) = last.rsplit_once('.')?;
    let usable = !stem.is_empty()
        && (1..=MAX_EXTENSION_LEN).contains(&ext.len())
        && ext.chars().all(|c| c.is_ascii_alphanumeric());
    usable.then(|| ext.to_ascii_lowercase())
}

/// Why an entry was passed over without being counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Block has no publication number.
    MissingIdentifier,
    /// Block has no file link.
    MissingLink {
        /// Publication number of the block.
        identifier: String,
    },
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdentifier => write!(f, "document number not found"),
            Self::MissingLink { identifier } => write!(f, "document {identifier}: no file link"),
        }
    }
}

/// Result of processing one document block.
#[derive(Debug)]
pub enum EntryOutcome {
    /// File fetched and written.
    Downloaded {
        /// Bytes written to disk.
        bytes: u64,
    },
    /// File already on disk; no request issued.
    Skipped,
    /// Block lacked data; not counted in page statistics.
    Ignored(IgnoreReason),
    /// Counted as an error.
    Failed(CatalogError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://publication.pravo.gov.ru").unwrap()
    }

    #[test]
    fn test_resolve_relative_href_against_base() {
        let entry = CatalogEntry::resolve(
            "0001202401150001",
            "/file/pdf?eoNumber=0001202401150001",
            &base(),
            Path::new("pdfs"),
            "pdf",
        )
        .unwrap();
        assert_eq!(
            entry.file_url.as_str(),
            "http://publication.pravo.gov.ru/file/pdf?eoNumber=0001202401150001"
        );
        assert_eq!(entry.path, PathBuf::from("pdfs/0001202401150001.pdf"));
    }

    #[test]
    fn test_resolve_keeps_absolute_href() {
        let entry = CatalogEntry::resolve(
            "42",
            "https://static.example.org/docs/42.DOCX",
            &base(),
            Path::new("out"),
            "pdf",
        )
        .unwrap();
        assert_eq!(entry.file_url.host_str(), Some("static.example.org"));
        assert_eq!(entry.path, PathBuf::from("out/42.docx"));
    }

    #[test]
    fn test_resolve_rejects_path_traversal_identifier() {
        let result = CatalogEntry::resolve("../escape", "/f.pdf", &base(), Path::new("pdfs"), "pdf");
        assert!(matches!(result, Err(CatalogError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_resolve_rejects_unresolvable_href() {
        let result = CatalogEntry::resolve("1", "http://[::1", &base(), Path::new("pdfs"), "pdf");
        assert!(matches!(result, Err(CatalogError::InvalidUrl { .. })));
    }

    #[test]
    fn test_document_file_name_rejects_dot_names() {
        assert!(document_file_name(".", "pdf").is_err());
        assert!(document_file_name("..", "pdf").is_err());
        assert!(document_file_name("a\\b", "pdf").is_err());
        assert_eq!(document_file_name("12-34", "pdf").unwrap(), "12-34.pdf");
    }

    #[test]
    fn test_file_extension_only_for_short_alphanumeric_suffix() {
        let ext = |s: &str| file_extension(&Url::parse(s).unwrap());
        assert_eq!(ext("http://h/files/decree.PDF"), Some("pdf".to_string()));
        assert_eq!(ext("http://h/file/pdf?eoNumber=1"), None);
        assert_eq!(ext("http://h/files/archive.tar-gz"), None);
        assert_eq!(ext("http://h/files/.hidden"), None);
        assert_eq!(ext("http://h/"), None);
    }

    #[test]
    fn test_ignore_reason_display_names_document() {
        let reason = IgnoreReason::MissingLink {
            identifier: "0001".to_string(),
        };
        assert_eq!(reason.to_string(), "document 0001: no file link");
    }
}
