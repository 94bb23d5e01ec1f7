//! Built-in target list and target resolution

/// Targets processed when no other source provides a list
pub const DEFAULT_TARGETS: &[&str] = &[
    "https://example.com/",
    "https://httpbin.org/html",
    "https://www.iana.org/domains/reserved",
    "https://www.rfc-editor.org/",
    "https://www.ietf.org/",
    "https://go.dev/",
    "https://pkg.go.dev/",
    "https://docs.python.org/tr/3/",
    "https://git-scm.com/book/tr/v2",
    "https://developer.mozilla.org/tr/",
    "https://learn.microsoft.com/tr-tr/",
    "https://tr.wikipedia.org/wiki/Anasayfa",
    "https://tr.wikipedia.org/wiki/Türkiye",
    "https://tr.wiktionary.org/wiki/Vikis%C3%B6zl%C3%BCk:Anasayfa",
    "https://tr.wikiquote.org/wiki/Anasayfa",
];

/// Returns an owned copy of [`DEFAULT_TARGETS`]
pub fn default_targets() -> Vec<String> {
    DEFAULT_TARGETS.iter().map(|t| t.to_string()).collect()
}

/// Chooses the targets for a run
///
/// Priority order:
/// 1. A non-empty single `url`
/// 2. `defaults` when `all` is set or no positional targets exist
/// 3. The positional targets
pub fn resolve_targets(
    url: Option<&str>,
    all: bool,
    positional: &[String],
    defaults: &[String],
) -> Vec<String> {
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        return vec![url.to_string()];
    }

    if all || positional.is_empty() {
        return defaults.to_vec();
    }

    positional.to_vec()
}
