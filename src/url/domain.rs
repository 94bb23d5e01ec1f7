use url::Url;

/// Extracts the authority used to name a site's output directory
///
/// This is the lowercase host, followed by `:port` when the URL carries a
/// non-default port. Returns None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_snap::url::extract_authority;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_authority(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();

    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
