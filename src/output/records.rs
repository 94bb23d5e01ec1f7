//! Result records written to `meta.json` and `summary.json`

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of processing one target
///
/// Created when the pipeline starts on a target, filled in stage by stage,
/// and written once when the pipeline finishes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteResult {
    /// The target exactly as it was given
    pub url: String,

    /// Per-site output directory (empty if the target was rejected)
    pub out_dir: String,

    /// HTTP status code, 0 when no response was received
    pub http_status: u16,

    /// HTTP status line, e.g. "200 OK"
    pub http_status_text: String,

    /// Time spent in the fetch stage
    pub fetch_elapsed_ms: u64,

    /// Whether a screenshot was captured and saved
    pub screenshot_ok: bool,

    /// Number of distinct links extracted
    pub links_found: usize,

    /// Human-readable error, empty when the target succeeded
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub error: String,

    /// When processing of the target started (RFC 3339, UTC)
    pub timestamp_utc: String,
}

impl SiteResult {
    /// Creates a result for `url` stamped with the current time
    pub fn new(url: &str) -> Self {
        Self::started_at(url, Utc::now())
    }

    /// Creates a result for `url` stamped with `at`
    pub fn started_at(url: &str, at: DateTime<Utc>) -> Self {
        Self {
            url: url.to_string(),
            timestamp_utc: at.to_rfc3339_opts(SecondsFormat::Secs, true),
            ..Default::default()
        }
    }

    /// Records an error message, replacing any previous one
    pub fn fail(&mut self, error: impl std::fmt::Display) {
        self.error = error.to_string();
    }

    /// Appends an error message to any already recorded, separated by "; "
    pub fn push_error(&mut self, error: impl std::fmt::Display) {
        if self.error.is_empty() {
            self.error = error.to_string();
        } else {
            self.error = format!("{}; {}", self.error, error);
        }
    }

    /// Returns true if no stage recorded an error
    pub fn is_success(&self) -> bool {
        self.error.is_empty()
    }
}

/// All site results of a run, in processing order
///
/// Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchSummary {
    results: Vec<SiteResult>,
}

impl BatchSummary {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            results: Vec::with_capacity(capacity),
        }
    }

    /// Appends the result of the next processed target
    pub fn push(&mut self, result: SiteResult) {
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn results(&self) -> &[SiteResult] {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = &SiteResult> {
        self.results.iter()
    }
}
