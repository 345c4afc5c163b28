//! Error types for catalog requests and file writes.
//!
//! Every variant carries the URL or path it concerns so a single log line is
//! enough to locate the failing entry.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while talking to the catalog or writing files.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error requesting {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout requesting {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response.
    #[error("HTTP {status} requesting {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// File system error (create, write, existence check).
    #[error("IO error on {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// A URL could not be parsed or resolved.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The offending URL or href.
        url: String,
    },

    /// A configured header value is not a valid HTTP header value.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },

    /// Publication identifier cannot be used as a file name.
    #[error("identifier {identifier:?} cannot be used as a file name")]
    InvalidIdentifier {
        /// The identifier as extracted from the listing.
        identifier: String,
    },
}

impl CatalogError {
    /// Creates a transport error, classifying timeouts separately.
    pub fn transport(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates an invalid header error.
    pub fn invalid_header(name: &'static str) -> Self {
        Self::InvalidHeader { name }
    }

    /// Creates an invalid identifier error.
    pub fn invalid_identifier(identifier: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            identifier: identifier.into(),
        }
    }

    /// HTTP status code, when the failure was a non-success response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// No From<reqwest::Error> / From<std::io::Error>: the variants need the URL or
// path, which the source errors do not carry. Use the constructors above.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_error_timeout_display() {
        let error = CatalogError::Timeout {
            url: "http://example.com/file/pdf?eoNumber=1".to_string(),
        };
        assert!(error.to_string().contains("timeout"));
        assert!(error.to_string().contains("eoNumber=1"));
    }

    #[test]
    fn test_catalog_error_http_status_display_and_status() {
        let error = CatalogError::http_status("http://example.com/doc", 503);
        let msg = error.to_string();
        assert!(msg.contains("503"), "Expected '503' in: {msg}");
        assert!(msg.contains("http://example.com/doc"), "Expected URL in: {msg}");
        assert_eq!(error.status(), Some(503));
    }

    #[test]
    fn test_catalog_error_io_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let error = CatalogError::io(PathBuf::from("/tmp/0001.pdf"), io_error);
        let msg = error.to_string();
        assert!(msg.contains("/tmp/0001.pdf"), "Expected path in: {msg}");
        assert_eq!(error.status(), None);
    }

    #[test]
    fn test_catalog_error_invalid_identifier_display() {
        let error = CatalogError::invalid_identifier("../etc");
        let msg = error.to_string();
        assert!(msg.contains("\"../etc\""), "Expected quoted identifier in: {msg}");
    }
}
