//! Run statistics derived from a batch summary

use crate::output::BatchSummary;

/// Tally of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchStatistics {
    /// Number of targets processed
    pub total: usize,

    /// Targets with no recorded error
    pub succeeded: usize,

    /// Targets with a recorded error (including screenshot-only failures)
    pub failed: usize,

    /// Targets whose HTML was fetched with a 2xx/3xx status
    pub fetched: usize,

    /// Screenshots captured
    pub screenshots: usize,

    /// Sum of distinct links over all targets
    pub total_links: usize,
}

impl BatchStatistics {
    /// Computes statistics from a summary
    pub fn from_summary(summary: &BatchSummary) -> Self {
        let mut stats = Self {
            total: summary.len(),
            ..Default::default()
        };

        for result in summary.iter() {
            if result.is_success() {
                stats.succeeded += 1;
            } else {
                stats.failed += 1;
            }
            if (200..400).contains(&result.http_status) {
                stats.fetched += 1;
            }
            if result.screenshot_ok {
                stats.screenshots += 1;
            }
            stats.total_links += result.links_found;
        }

        stats
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &BatchStatistics) {
    let success_rate = if stats.total > 0 {
        (stats.succeeded as f64 / stats.total as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "    Sites: {} ok / {} failed ({:.1}% success), pages fetched: {}",
        stats.succeeded, stats.failed, success_rate, stats.fetched
    );
    println!(
        "    Links: {}, screenshots: {}",
        stats.total_links, stats.screenshots
    );
}
