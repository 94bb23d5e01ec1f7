//! Site-Snap: a one-shot page snapshot crawler
//!
//! This crate fetches a list of web pages, saves their raw HTML, extracts outbound
//! links, optionally captures a full-page screenshot with a headless browser, and
//! writes per-site artifacts plus a run summary to disk.

pub mod config;
pub mod crawler;
pub mod output;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Site-Snap operations
///
/// Every per-target failure is rendered through `Display` into the
/// `error` field of that target's [`output::SiteResult`].
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] UrlError),

    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("connection error: {0}")]
    Network(String),

    #[error("request timed out for {url}")]
    Timeout { url: String },

    #[error("HTTP error: {status}")]
    HttpStatus { status: String },

    #[error("failed to read body: {0}")]
    Read(String),

    #[error("screenshot failed: {0}")]
    Automation(String),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("failed to parse {input:?}: {source}")]
    Parse {
        input: String,
        source: ::url::ParseError,
    },

    #[error("missing scheme in {0:?}")]
    MissingScheme(String),

    #[error("missing host in {0:?}")]
    MissingHost(String),
}

/// Result type alias for Site-Snap operations
pub type Result<T> = std::result::Result<T, SnapError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::RunConfig;
pub use crawler::{BatchRunner, ScreenshotCapturer, SiteContext};
pub use output::{BatchSummary, SiteResult};
pub use crate::url::{parse_target, site_slug};
