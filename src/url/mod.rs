//! URL handling module for Site-Snap
//!
//! This module provides target validation, host extraction and the
//! filesystem-safe site slugs used to name per-site output directories.

mod domain;
mod slug;

// Re-export main functions
pub use domain::extract_authority;
pub use slug::{sanitize, site_slug, PLACEHOLDER_HOST};

use crate::{UrlError, UrlResult};
use url::Url;

/// Parses a target string into an absolute URL
///
/// Surrounding whitespace is ignored. The parsed URL must carry both a
/// scheme and a non-empty host, otherwise the target is rejected before
/// any I/O takes place.
///
/// # Examples
///
/// ```
/// use site_snap::url::parse_target;
///
/// let url = parse_target("  https://example.com/page ").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
///
/// assert!(parse_target("example.com").is_err());
/// assert!(parse_target("mailto:someone@example.com").is_err());
/// ```
pub fn parse_target(raw: &str) -> UrlResult<Url> {
    let trimmed = raw.trim();

    let url = Url::parse(trimmed).map_err(|source| UrlError::Parse {
        input: trimmed.to_string(),
        source,
    })?;

    if url.scheme().is_empty() {
        return Err(UrlError::MissingScheme(trimmed.to_string()));
    }

    match url.host_str() {
        Some(host) if !host.is_empty() => Ok(url),
        _ => Err(UrlError::MissingHost(trimmed.to_string())),
    }
}
