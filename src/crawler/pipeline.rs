//! Per-site pipeline
//!
//! Stages run in a fixed order and never go back:
//!
//! 1. Validate the target
//! 2. Prepare `{output_root}/{slug}/`, dropping artifacts of a previous run
//! 3. Fetch
//! 4. Persist `site_data.html`
//! 5. Extract links and persist `links.txt` (write failures tolerated)
//! 6. Screenshot, if a capturer is configured (failures recorded, artifacts kept)
//! 7. Persist `meta.json`
//!
//! Stages 2-5 stop the pipeline on failure; stage 7 runs for every target
//! that passed validation.

use crate::config::RunConfig;
use crate::crawler::fetcher::{build_http_client, fetch_page};
use crate::crawler::parser::extract_links;
use crate::crawler::screenshot::{ChromiumCapturer, ScreenshotCapturer};
use crate::output::{
    write_json, write_links, SiteResult, HTML_FILE, LINKS_FILE, META_FILE, SCREENSHOT_FILE,
};
use crate::url::{parse_target, site_slug};
use crate::SnapError;
use reqwest::Client;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

/// Everything the pipeline needs to process one site
#[derive(Clone)]
pub struct SiteContext {
    client: Client,
    output_root: PathBuf,
    site_timeout: Duration,
    keep_error_pages: bool,
    capturer: Option<Arc<dyn ScreenshotCapturer>>,
}

impl SiteContext {
    /// Creates a context without screenshot capture
    pub fn new(client: Client, output_root: impl Into<PathBuf>, site_timeout: Duration) -> Self {
        Self {
            client,
            output_root: output_root.into(),
            site_timeout,
            keep_error_pages: false,
            capturer: None,
        }
    }

    /// Builds the HTTP client and, if enabled, the Chromium capturer
    pub fn from_config(config: &RunConfig) -> Result<Self, SnapError> {
        let client = build_http_client(&config.user_agent, config.fetch_timeout)?;

        let mut context = Self::new(client, &config.output_root, config.site_timeout)
            .keep_error_pages(config.keep_error_pages);

        if config.screenshots {
            context = context.with_capturer(Arc::new(ChromiumCapturer::new(
                config.screenshot.clone(),
            )));
        }

        Ok(context)
    }

    /// Enables screenshots through `capturer`
    pub fn with_capturer(mut self, capturer: Arc<dyn ScreenshotCapturer>) -> Self {
        self.capturer = Some(capturer);
        self
    }

    /// Persist HTML and links of responses with status >= 400
    ///
    /// Off by default: error pages are reported but not saved.
    pub fn keep_error_pages(mut self, keep: bool) -> Self {
        self.keep_error_pages = keep;
        self
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn screenshots_enabled(&self) -> bool {
        self.capturer.is_some()
    }
}

/// Runs the full pipeline for one target
///
/// Never fails: every error ends up in the returned [`SiteResult`].
pub async fn process_site(ctx: &SiteContext, raw_url: &str) -> SiteResult {
    let mut result = SiteResult::new(raw_url);

    let url = match parse_target(raw_url) {
        Ok(url) => url,
        Err(e) => {
            warn!(target_url = %raw_url, "Rejected target: {}", e);
            result.fail(SnapError::from(e));
            return result;
        }
    };
    let canonical = url.as_str();

    let out_dir = ctx.output_root.join(site_slug(canonical));
    result.out_dir = out_dir.display().to_string();

    if let Err(source) = tokio::fs::create_dir_all(&out_dir).await {
        result.fail(SnapError::CreateDir {
            path: out_dir.clone(),
            source,
        });
        return finish(&out_dir, result).await;
    }
    remove_stale_artifacts(&out_dir).await;

    let deadline = Instant::now() + ctx.site_timeout;

    debug!(url = %canonical, "Fetching");
    let started = Instant::now();
    let fetched = fetch_page(&ctx.client, canonical, deadline).await;
    result.fetch_elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let (status_code, status_text, body, error) = fetched.into_parts();
    result.http_status = status_code;
    result.http_status_text = status_text;

    let body = match (body, error) {
        (Some(body), None) => body,
        (Some(body), Some(error @ SnapError::HttpStatus { .. })) if ctx.keep_error_pages => {
            result.fail(error);
            body
        }
        (_, error) => {
            if let Some(error) = error {
                result.fail(error);
            }
            return finish(&out_dir, result).await;
        }
    };

    let html_path = out_dir.join(HTML_FILE);
    if let Err(source) = tokio::fs::write(&html_path, &body).await {
        result.fail(SnapError::Write {
            path: html_path,
            source,
        });
        return finish(&out_dir, result).await;
    }

    let links = extract_links(&url, &body);
    result.links_found = links.len();
    if let Err(e) = write_links(&out_dir.join(LINKS_FILE), &links).await {
        warn!(url = %canonical, "Links not saved: {}", e);
    }

    if let Some(capturer) = &ctx.capturer {
        let shot_path = out_dir.join(SCREENSHOT_FILE);
        match timeout_at(deadline, capturer.capture(canonical, &shot_path)).await {
            Ok(Ok(())) => result.screenshot_ok = true,
            Ok(Err(e)) => result.push_error(as_automation_error(e)),
            Err(_) => {
                let _ = tokio::fs::remove_file(&shot_path).await;
                result.push_error(SnapError::Automation("deadline exceeded".to_string()));
            }
        }
    }

    finish(&out_dir, result).await
}

/// Removes artifacts a previous run left in `out_dir`
///
/// A re-run overwrites the site directory, so nothing may survive that the
/// new `meta.json` does not vouch for.
async fn remove_stale_artifacts(out_dir: &Path) {
    for name in [HTML_FILE, LINKS_FILE, SCREENSHOT_FILE] {
        let path = out_dir.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => debug!(path = %path.display(), "Removed previous artifact"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => debug!(path = %path.display(), "Previous artifact not removed: {}", e),
        }
    }
}

/// Writes `meta.json` and hands the result back
async fn finish(out_dir: &Path, result: SiteResult) -> SiteResult {
    if let Err(e) = write_json(&out_dir.join(META_FILE), &result).await {
        warn!(url = %result.url, "Metadata not saved: {}", e);
    }

    if result.is_success() {
        info!(
            url = %result.url,
            status = result.http_status,
            links = result.links_found,
            screenshot = result.screenshot_ok,
            "Site processed"
        );
    } else {
        info!(url = %result.url, status = result.http_status, "Site failed: {}", result.error);
    }

    result
}

fn as_automation_error(error: SnapError) -> SnapError {
    match error {
        SnapError::Automation(_) => error,
        other => SnapError::Automation(other.to_string()),
    }
}
