//! Output module for per-site artifacts and the run summary
//!
//! This module handles:
//! - The per-target [`SiteResult`] record and the ordered [`BatchSummary`]
//! - Writing pretty-printed JSON and link lists to disk
//! - Tallying and printing run statistics

mod records;
mod stats;
mod writer;

pub use records::{BatchSummary, SiteResult};
pub use stats::{print_statistics, BatchStatistics};
pub use writer::{render_links, write_json, write_links, OutputError, OutputResult};

/// File name of the raw response body inside a site directory
pub const HTML_FILE: &str = "site_data.html";

/// File name of the extracted link list inside a site directory
pub const LINKS_FILE: &str = "links.txt";

/// File name of the full-page screenshot inside a site directory
pub const SCREENSHOT_FILE: &str = "screenshot.png";

/// File name of the per-site metadata inside a site directory
pub const META_FILE: &str = "meta.json";

/// File name of the aggregate summary inside the output root
pub const SUMMARY_FILE: &str = "summary.json";
