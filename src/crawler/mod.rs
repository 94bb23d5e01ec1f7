//! Crawler module for fetching and snapshotting pages
//!
//! This module contains the per-site pipeline and its stages:
//! - HTTP fetching bounded by a per-site deadline
//! - Lexical link extraction
//! - Full-page screenshots through a headless browser
//! - The sequential batch runner

mod fetcher;
mod parser;
mod pipeline;
mod runner;
mod screenshot;

pub use fetcher::{build_http_client, fetch_page, status_line, FetchResult};
pub use parser::extract_links;
pub use pipeline::{process_site, SiteContext};
pub use runner::{BatchReport, BatchRunner};
pub use screenshot::{ChromiumCapturer, ScreenshotCapturer};

use crate::config::RunConfig;
use crate::SnapError;

/// Runs a complete batch described by `config`
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP client and, if enabled, the screenshot capturer
/// 2. Create the output root
/// 3. Process every target in order
/// 4. Write `summary.json`
pub async fn run(config: &RunConfig) -> Result<BatchReport, SnapError> {
    BatchRunner::from_config(config)?.run(&config.targets).await
}
