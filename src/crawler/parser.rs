//! Link extraction from raw HTML bytes
//!
//! This is a lexical scan for `href=` attributes rather than a conformant
//! HTML parser. It misses links built by scripts and may pick up
//! attribute-like text inside comments or scripts; callers accept that
//! approximation.

use std::collections::BTreeSet;
use url::Url;

const HREF_MARKER: &[u8] = b"href=";

/// Extracts every hyperlink reference from `html` as an absolute URL
///
/// # Extraction Rules
///
/// - `href=` is matched case-insensitively and must be followed directly by
///   a `"` or `'` delimited value; unquoted values are skipped
/// - An unterminated quote ends the scan
/// - Empty values, fragment-only references and `javascript:` / `mailto:`
///   URLs are skipped
/// - Values are resolved against `base_url`; the fragment is dropped
///
/// # Returns
///
/// Distinct absolute URLs in lexicographic order
///
/// # Example
///
/// ```
/// use site_snap::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("https://site.test/p/").unwrap();
/// let html = br#"<a href="/a">A</a> <a HREF='b#top'>B</a>"#;
/// assert_eq!(
///     extract_links(&base, html),
///     vec!["https://site.test/a", "https://site.test/p/b"]
/// );
/// ```
pub fn extract_links(base_url: &Url, html: &[u8]) -> Vec<String> {
    let mut found = BTreeSet::new();

    for raw in HrefScanner::new(html) {
        if let Some(link) = resolve_link(&raw, base_url) {
            found.insert(link);
        }
    }

    found.into_iter().collect()
}

/// Iterator over the raw quoted values following `href=` markers
struct HrefScanner<'a> {
    html: &'a [u8],
    pos: usize,
}

impl<'a> HrefScanner<'a> {
    fn new(html: &'a [u8]) -> Self {
        Self { html, pos: 0 }
    }
}

impl Iterator for HrefScanner<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let marker = find_marker(&self.html[self.pos..])? + self.pos;
            let quote_at = marker + HREF_MARKER.len();
            let quote = *self.html.get(quote_at)?;

            if quote != b'"' && quote != b'\'' {
                self.pos = quote_at;
                continue;
            }

            let value_start = quote_at + 1;
            let len = self.html[value_start..]
                .iter()
                .position(|&b| b == quote)?;
            let value_end = value_start + len;
            self.pos = value_end + 1;

            return Some(String::from_utf8_lossy(&self.html[value_start..value_end]).into_owned());
        }
    }
}

/// Finds the next `href=` marker, ignoring ASCII case
fn find_marker(haystack: &[u8]) -> Option<usize> {
    haystack
        .windows(HREF_MARKER.len())
        .position(|window| window.eq_ignore_ascii_case(HREF_MARKER))
}

/// Resolves a raw href value to an absolute URL without fragment
///
/// Returns None if the value should be skipped or fails to resolve.
fn resolve_link(raw: &str, base_url: &Url) -> Option<String> {
    let href = raw.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if has_prefix_ignore_case(href, "javascript:") || has_prefix_ignore_case(href, "mailto:") {
        return None;
    }

    let mut absolute = base_url.join(href).ok()?;
    absolute.set_fragment(None);
    Some(absolute.into())
}

fn has_prefix_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
