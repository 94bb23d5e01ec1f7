use crate::config::targets::{default_targets, resolve_targets};
use crate::config::validation::validate_run_config;
use crate::ConfigResult;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Default output root directory
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// Default per-site timeout in seconds
pub const DEFAULT_SITE_TIMEOUT_SECS: u64 = 25;

/// Default fetch-level timeout in seconds
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Default browser viewport width in pixels
pub const DEFAULT_VIEWPORT_WIDTH: u32 = 1366;

/// Default browser viewport height in pixels
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 768;

/// Configuration file structure for Site-Snap
///
/// Every section is optional; missing keys fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target list used when no target is given on the command line
    pub targets: Vec<String>,

    pub run: RunSection,

    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,

    pub screenshot: ScreenshotConfig,
}

/// Run behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RunSection {
    /// Directory receiving per-site folders and summary.json
    #[serde(rename = "output-root")]
    pub output_root: String,

    /// Upper bound for one site's fetch and screenshot (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Timeout of the HTTP client itself (seconds)
    #[serde(rename = "fetch-timeout-secs")]
    pub fetch_timeout_secs: u64,

    /// Whether to capture screenshots
    pub screenshots: bool,

    /// Persist HTML and links of responses with status >= 400
    #[serde(rename = "keep-error-pages")]
    pub keep_error_pages: bool,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            output_root: DEFAULT_OUTPUT_ROOT.to_string(),
            timeout_secs: DEFAULT_SITE_TIMEOUT_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            screenshots: true,
            keep_error_pages: false,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "site-snap".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the header value: `name/version (+contact)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    #[serde(rename = "viewport-width")]
    pub viewport_width: u32,

    #[serde(rename = "viewport-height")]
    pub viewport_height: u32,

    /// Path to Chrome/Chromium executable (None for auto-detection)
    #[serde(rename = "chrome-path")]
    pub chrome_path: Option<String>,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            chrome_path: None,
        }
    }
}

/// Values supplied by the argument source, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Single target, takes priority over everything else
    pub url: Option<String>,

    /// Run the default target list
    pub all: bool,

    /// Ad-hoc target list
    pub positional: Vec<String>,

    pub output_root: Option<PathBuf>,

    pub timeout_secs: Option<u64>,

    pub no_screenshot: bool,

    pub keep_error_pages: bool,

    pub chrome_path: Option<String>,
}

/// Fully resolved configuration consumed by the batch runner
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Targets in processing order
    pub targets: Vec<String>,

    pub output_root: PathBuf,

    /// Deadline for one site, covering fetch and screenshot
    pub site_timeout: Duration,

    /// HTTP client timeout, further bounded by `site_timeout`
    pub fetch_timeout: Duration,

    pub screenshots: bool,

    pub keep_error_pages: bool,

    pub user_agent: UserAgentConfig,

    pub screenshot: ScreenshotConfig,
}

impl RunConfig {
    /// Merges the file configuration with command-line overrides
    ///
    /// The default target list is the file's `targets` when non-empty,
    /// otherwise the built-in list.
    pub fn resolve(file: Config, overrides: Overrides) -> ConfigResult<Self> {
        let defaults = if file.targets.is_empty() {
            default_targets()
        } else {
            file.targets
        };

        let targets = resolve_targets(
            overrides.url.as_deref(),
            overrides.all,
            &overrides.positional,
            &defaults,
        );

        let mut screenshot = file.screenshot;
        if overrides.chrome_path.is_some() {
            screenshot.chrome_path = overrides.chrome_path;
        }

        let config = Self {
            targets,
            output_root: overrides
                .output_root
                .unwrap_or_else(|| PathBuf::from(file.run.output_root)),
            site_timeout: Duration::from_secs(
                overrides.timeout_secs.unwrap_or(file.run.timeout_secs),
            ),
            fetch_timeout: Duration::from_secs(file.run.fetch_timeout_secs),
            screenshots: file.run.screenshots && !overrides.no_screenshot,
            keep_error_pages: file.run.keep_error_pages || overrides.keep_error_pages,
            user_agent: file.user_agent,
            screenshot,
        };

        validate_run_config(&config)?;
        Ok(config)
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            targets: default_targets(),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            site_timeout: Duration::from_secs(DEFAULT_SITE_TIMEOUT_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            screenshots: true,
            keep_error_pages: false,
            user_agent: UserAgentConfig::default(),
            screenshot: ScreenshotConfig::default(),
        }
    }
}
