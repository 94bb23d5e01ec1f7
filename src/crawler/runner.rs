//! Batch runner
//!
//! Feeds targets through the site pipeline one at a time and writes the
//! aggregate `summary.json` once every target has finished.

use crate::config::RunConfig;
use crate::crawler::pipeline::{process_site, SiteContext};
use crate::output::{write_json, BatchStatistics, BatchSummary, SiteResult, SUMMARY_FILE};
use crate::SnapError;
use std::path::PathBuf;
use tracing::{info, warn};

/// Outcome of a finished run
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// Site results in input order
    pub summary: BatchSummary,

    /// Where the summary was written
    pub summary_path: PathBuf,

    pub statistics: BatchStatistics,
}

/// Sequential driver over a list of targets
pub struct BatchRunner {
    context: SiteContext,
}

impl BatchRunner {
    pub fn new(context: SiteContext) -> Self {
        Self { context }
    }

    /// Creates a runner with the HTTP client and capturer described by `config`
    pub fn from_config(config: &RunConfig) -> Result<Self, SnapError> {
        Ok(Self::new(SiteContext::from_config(config)?))
    }

    /// Processes every target in order and writes the summary
    ///
    /// # Errors
    ///
    /// Only fails if the output root cannot be created, before any target
    /// is attempted. Per-target failures are reported in the summary.
    pub async fn run(&self, targets: &[String]) -> Result<BatchReport, SnapError> {
        let root = self.context.output_root().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .map_err(|source| SnapError::CreateDir {
                path: root.clone(),
                source,
            })?;

        info!(
            "Processing {} targets into {} (screenshots: {})",
            targets.len(),
            root.display(),
            self.context.screenshots_enabled()
        );

        let total = targets.len();
        let mut summary = BatchSummary::with_capacity(total);

        for (index, target) in targets.iter().enumerate() {
            println!("\n[{}/{}] {}", index + 1, total, target);

            let result = process_site(&self.context, target).await;
            print_outcome(&result);
            summary.push(result);
        }

        let summary_path = root.join(SUMMARY_FILE);
        if let Err(e) = write_json(&summary_path, &summary).await {
            warn!("Summary not saved: {}", e);
        }

        let statistics = BatchStatistics::from_summary(&summary);
        info!(
            "Run finished: {} ok, {} failed",
            statistics.succeeded, statistics.failed
        );

        Ok(BatchReport {
            summary,
            summary_path,
            statistics,
        })
    }
}

/// Prints the one-line outcome of a target
fn print_outcome(result: &SiteResult) {
    println!("{}", outcome_line(result));
}

fn outcome_line(result: &SiteResult) -> String {
    if result.is_success() {
        format!(
            "   [+] HTML saved. status={}, links={}, screenshot={}",
            result.http_status, result.links_found, result.screenshot_ok
        )
    } else {
        format!("   [-] Error: {}", result.error)
    }
}
