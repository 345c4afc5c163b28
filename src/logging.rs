//! Tracing setup: console output plus a plain-text log file.

use std::path::Path;

use anyhow::{Context, Result};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

/// Filter for the log file: everything this crate emits at debug, warnings
/// from dependencies.
const FILE_FILTER: &str = "catalog_downloader=debug,warn";

/// Console log level from the verbosity flags.
#[must_use]
pub fn console_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

/// Installs the global subscriber.
///
/// The console layer writes to stderr and honours `RUST_LOG`, falling back to
/// `default_level`. The file layer appends timestamped lines without ANSI
/// colours to `log_file`, creating its directory when needed.
///
/// # Errors
///
/// Fails when the log file cannot be opened.
pub fn init_tracing(default_level: &str, log_file: &Path) -> Result<()> {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let directory = log_file
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(directory)
        .with_context(|| format!("failed to create log directory {}", directory.display()))?;
    let file_name = log_file
        .file_name()
        .and_then(|name| name.to_str())
        .context("log file path has no file name")?;
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(directory)
        .with_context(|| format!("failed to open log file {}", log_file.display()))?;
    let file_layer = fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false)
        .with_filter(EnvFilter::new(FILE_FILTER));

    let _ = tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init();
    Ok(())
}
