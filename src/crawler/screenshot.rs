//! Screenshot capture using headless Chrome/Chromium
//!
//! The pipeline only depends on the [`ScreenshotCapturer`] capability, so a
//! missing browser binary affects this stage alone and tests can swap in a
//! stub.

use crate::config::ScreenshotConfig;
use crate::SnapError;
use anyhow::Context;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::ScreenshotParams;
use futures_util::StreamExt;
use std::path::Path;
use tracing::{debug, warn};

/// Capability to capture a full-page image of a URL
#[async_trait]
pub trait ScreenshotCapturer: Send + Sync {
    /// Loads `url` and writes a full-page image to `output_path`
    ///
    /// On error no file is written.
    async fn capture(&self, url: &str, output_path: &Path) -> Result<(), SnapError>;
}

/// Captures screenshots with a fresh headless Chromium per call
#[derive(Debug, Clone)]
pub struct ChromiumCapturer {
    config: ScreenshotConfig,
}

impl ChromiumCapturer {
    pub fn new(config: ScreenshotConfig) -> Self {
        Self { config }
    }

    fn browser_config(&self) -> anyhow::Result<BrowserConfig> {
        let mut builder = BrowserConfig::builder()
            .window_size(self.config.viewport_width, self.config.viewport_height)
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--hide-scrollbars");

        if let Some(ref chrome_path) = self.config.chrome_path {
            builder = builder.chrome_executable(chrome_path);
        }

        builder
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build browser config: {e}"))
    }

    async fn capture_png(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .context("failed to launch browser")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    debug!("Browser handler error: {e}");
                }
            }
        });

        let result = render_full_page(&browser, url).await;

        if let Err(e) = browser.close().await {
            warn!("Failed to close browser: {e}");
        }
        if let Err(e) = browser.wait().await {
            debug!("Browser did not exit cleanly: {e}");
        }
        handler_task.abort();

        result
    }
}

#[async_trait]
impl ScreenshotCapturer for ChromiumCapturer {
    async fn capture(&self, url: &str, output_path: &Path) -> Result<(), SnapError> {
        debug!(url = %url, "Capturing screenshot");

        let png = self
            .capture_png(url)
            .await
            .map_err(|e| SnapError::Automation(format!("{e:#}")))?;

        tokio::fs::write(output_path, &png)
            .await
            .map_err(|source| SnapError::Write {
                path: output_path.to_path_buf(),
                source,
            })?;

        debug!(url = %url, size = png.len(), "Screenshot captured");
        Ok(())
    }
}

/// Navigates to `url`, waits for `body` and captures the whole page
async fn render_full_page(browser: &Browser, url: &str) -> anyhow::Result<Vec<u8>> {
    let page = browser
        .new_page(url)
        .await
        .context("failed to open page")?;

    page.wait_for_navigation()
        .await
        .context("navigation failed")?;

    page.find_element("body")
        .await
        .context("document body not found")?;

    let params = ScreenshotParams::builder()
        .format(CaptureScreenshotFormat::Png)
        .full_page(true)
        .build();

    let png = page
        .screenshot(params)
        .await
        .context("failed to capture screenshot")?;

    if let Err(e) = page.close().await {
        warn!("Failed to close page: {e}");
    }

    Ok(png)
}
