//! Site slug generation
//!
//! A slug names the output directory of one target: the sanitized host
//! followed by a short fingerprint of the full URL, e.g.
//! `example_com_1a2b3c4d`. The same URL always maps to the same slug, so a
//! re-run overwrites the previous artifacts instead of duplicating them.

use super::domain::extract_authority;
use sha2::{Digest, Sha256};
use url::Url;

/// Host substituted when a URL has no usable host
pub const PLACEHOLDER_HOST: &str = "site";

/// Number of hex characters kept from the URL fingerprint
const FINGERPRINT_LEN: usize = 8;

/// Builds the filesystem-safe slug for a URL
///
/// Never fails: an unparseable URL falls back to [`PLACEHOLDER_HOST`].
///
/// # Examples
///
/// ```
/// use site_snap::url::site_slug;
///
/// let slug = site_slug("https://www.iana.org/domains/reserved");
/// assert!(slug.starts_with("www_iana_org_"));
/// assert_eq!(slug, site_slug("https://www.iana.org/domains/reserved"));
/// ```
pub fn site_slug(url: &str) -> String {
    let host = Url::parse(url)
        .ok()
        .as_ref()
        .and_then(extract_authority)
        .unwrap_or_else(|| PLACEHOLDER_HOST.to_string());

    format!("{}_{}", sanitize(&host), fingerprint(url))
}

/// Sanitizes a string into `[a-z0-9_-]`
///
/// Lowercases the input, replaces every other character with `_` and trims
/// leading and trailing underscores. An empty result becomes
/// [`PLACEHOLDER_HOST`].
pub fn sanitize(input: &str) -> String {
    let replaced: String = input
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();

    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        PLACEHOLDER_HOST.to_string()
    } else {
        trimmed.to_string()
    }
}

/// First 8 hex characters of the SHA-256 digest of the exact URL string
fn fingerprint(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    let mut encoded = hex::encode(digest);
    encoded.truncate(FINGERPRINT_LEN);
    encoded
}
