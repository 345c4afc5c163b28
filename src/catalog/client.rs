//! The shared HTTP session used for every catalog request.
//!
//! [`CatalogClient`] is created once per run and reused for the listing pages
//! and every file download, so cookies set by the catalog survive across
//! requests and connections are pooled.
//!
//! Downloads are written to a `.part` sibling and moved into place only once
//! the body is complete, so a file at its final path is always whole.

use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, USER_AGENT};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::CatalogError;
use crate::config::{BrowserHeaders, CrawlerConfig};

/// Buffer size used when writing downloaded bodies to disk.
pub const WRITE_CHUNK_SIZE: usize = 8192;

/// Suffix of the in-progress file a download is streamed into.
pub const PARTIAL_SUFFIX: &str = ".part";

/// HTTP session for listing pages and file downloads.
///
/// # Example
///
/// ```no_run
/// use catalog_downloader::CrawlerConfig;
/// use catalog_downloader::catalog::CatalogClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = CrawlerConfig::default();
/// let client = CatalogClient::new(&config)?;
/// let body = client.fetch_page(&config.page_url(1)?).await?;
/// println!("{} bytes of markup", body.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
}

impl CatalogClient {
    /// Builds the session with the configured header set and a cookie store.
    ///
    /// `request_timeout` bounds connection setup and every individual read,
    /// not the whole transfer, so a large file that keeps arriving is never
    /// cut off.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidHeader`] when a configured header value is
    /// not valid, or [`CatalogError::Network`] when the client cannot be built.
    pub fn new(config: &CrawlerConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .default_headers(browser_header_map(&config.headers)?)
            .cookie_store(true)
            .gzip(true)
            .connect_timeout(config.request_timeout)
            .read_timeout(config.request_timeout)
            .build()
            .map_err(|e| CatalogError::transport(config.base_url.as_str(), e))?;
        Ok(Self { client })
    }

    /// Fetches a listing page and returns its body as text.
    ///
    /// # Errors
    ///
    /// Returns a transport error, or [`CatalogError::HttpStatus`] for any
    /// non-success status.
    #[instrument(level = "debug", skip(self), fields(url = %url))]
    pub async fn fetch_page(&self, url: &Url) -> Result<String, CatalogError> {
        let response = self.send(url).await?;
        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::transport(url.as_str(), e))?;
        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }

    /// Streams `url` into a new file at `path`, returning the bytes written.
    ///
    /// Nothing is created until the server has answered with a success
    /// status. The body goes to `<path>.part`, which is moved to `path` once
    /// complete and removed on any failure. An existing `path` is never
    /// replaced.
    ///
    /// # Errors
    ///
    /// Returns a transport error, [`CatalogError::HttpStatus`] for a
    /// non-success status, or [`CatalogError::Io`] when the file cannot be
    /// written or `path` already exists.
    #[instrument(level = "debug", skip(self), fields(url = %url, path = %path.display()))]
    pub async fn download_to_file(&self, url: &Url, path: &Path) -> Result<u64, CatalogError> {
        let response = self.send(url).await?;

        let part_path = partial_path(path);
        // Leftover from a download killed mid-stream.
        match tokio::fs::remove_file(&part_path).await {
            Ok(()) => debug!(part = %part_path.display(), "removed stale partial file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(CatalogError::io(&part_path, e)),
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&part_path)
            .await
            .map_err(|e| CatalogError::io(&part_path, e))?;

        let streamed = stream_to_file(&mut file, response, url, &part_path).await;
        drop(file);
        let result = match streamed {
            Ok(bytes) => finalize(&part_path, path).await.map(|()| bytes),
            Err(e) => Err(e),
        };
        if result.is_err() {
            debug!("cleaning up partial file after error");
            let _ = tokio::fs::remove_file(&part_path).await;
        }
        result
    }

    async fn send(&self, url: &Url) -> Result<reqwest::Response, CatalogError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::transport(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::http_status(url.as_str(), status.as_u16()));
        }
        Ok(response)
    }
}

/// Streams the response body to `file` in buffered chunks.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &Url,
    path: &Path,
) -> Result<u64, CatalogError> {
    let mut writer = BufWriter::with_capacity(WRITE_CHUNK_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| CatalogError::transport(url.as_str(), e))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| CatalogError::io(path, e))?;
        bytes_written += chunk.len() as u64;
    }

    writer.flush().await.map_err(|e| CatalogError::io(path, e))?;
    Ok(bytes_written)
}

/// `<path>.part`.
fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(PARTIAL_SUFFIX);
    PathBuf::from(name)
}

/// Publishes a complete `.part` file at `path`.
///
/// A hard link fails if `path` exists, so a file already in place is never
/// overwritten.
async fn finalize(part_path: &Path, path: &Path) -> Result<(), CatalogError> {
    tokio::fs::hard_link(part_path, path)
        .await
        .map_err(|e| CatalogError::io(path, e))?;
    if let Err(e) = tokio::fs::remove_file(part_path).await {
        warn!(part = %part_path.display(), error = %e, "failed to remove partial file");
    }
    Ok(())
}

fn browser_header_map(headers: &BrowserHeaders) -> Result<HeaderMap, CatalogError> {
    let mut map = HeaderMap::new();
    map.insert(
        USER_AGENT,
        HeaderValue::from_str(&headers.user_agent)
            .map_err(|_| CatalogError::invalid_header("user-agent"))?,
    );
    map.insert(
        ACCEPT,
        HeaderValue::from_str(&headers.accept).map_err(|_| CatalogError::invalid_header("accept"))?,
    );
    map.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&headers.accept_language)
            .map_err(|_| CatalogError::invalid_header("accept-language"))?,
    );
    Ok(map)
}
