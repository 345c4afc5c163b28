//! Shared helpers for integration tests: socket guard and listing markup.

#![allow(dead_code)]

use std::net::TcpListener;
use std::path::Path;

use catalog_downloader::CrawlerConfig;
use wiremock::MockServer;

/// Starts a mock server, or returns `None` when localhost sockets cannot be
/// bound in this environment. Set `CATALOG_REQUIRE_SOCKET_TESTS=1` to fail
/// instead of skipping.
pub async fn start_mock_server_or_skip() -> Option<MockServer> {
    if TcpListener::bind("127.0.0.1:0").is_ok() {
        return Some(MockServer::start().await);
    }
    let required = std::env::var("CATALOG_REQUIRE_SOCKET_TESTS")
        .is_ok_and(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));
    assert!(!required, "[socket-bound-test] cannot bind localhost socket");
    eprintln!("[socket-bound-test] cannot bind localhost socket. Skipping test.");
    None
}

/// Configuration pointed at `server` with every path inside `root` and no
/// pauses.
pub fn test_config(server: &MockServer, root: &Path) -> CrawlerConfig {
    let mut config = CrawlerConfig::for_base_url(&server.uri())
        .expect("mock server URI is valid")
        .without_delays();
    config.output_dir = root.join("pdfs");
    config.debug_dir = root.join("debug_responses");
    config.log_file = root.join("download.log");
    config.progress_file = root.join("progress.json");
    config
}

/// One document block with identifier and file link.
pub fn document_block(identifier: &str, href: &str) -> String {
    format!(
        r#"<div class="infoindocumentlist">
             <div class="documents-item-number">Номер опубликования: <span class="info-data">{identifier}</span></div>
             <a class="documents-item-file" href="{href}">PDF</a>
           </div>"#
    )
}

/// Pagination control listing pages `1..=last` followed by a "next" link.
pub fn pagination(last: u32) -> String {
    let mut items: String = (1..=last)
        .map(|index| format!(r#"<li><a href="/documents/block/president?index={index}&amp;pageSize=200">{index}</a></li>"#))
        .collect();
    items.push_str(r#"<li><a href="/documents/block/president?index=2&amp;pageSize=200">»</a></li>"#);
    format!(r#"<ul class="pagination">{items}</ul>"#)
}

/// A complete listing page.
pub fn listing_page(body: &str) -> String {
    format!("<!DOCTYPE html><html><head><meta charset=\"utf-8\"></head><body>{body}</body></html>")
}
