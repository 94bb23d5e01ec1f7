//! Site-Snap main entry point
//!
//! This is the command-line interface for the Site-Snap page snapshot crawler.

use clap::Parser;
use site_snap::config::{load_optional_config, Overrides, RunConfig};
use site_snap::output::print_statistics;
use site_snap::SnapError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_STATUS_HELP: &str = "Exit status:
  0  run completed, even if individual targets failed
  1  invalid configuration file or options
  2  output directory could not be created";

/// Site-Snap: save HTML, links and screenshots of web pages
///
/// Every target gets its own folder under the output root containing the
/// raw HTML, the extracted links, an optional full-page screenshot and a
/// meta.json record. A summary.json with all records is written at the end.
#[derive(Parser, Debug)]
#[command(name = "site-snap")]
#[command(version)]
#[command(about = "Snapshot web pages: HTML, links and screenshots", long_about = None)]
#[command(after_help = EXIT_STATUS_HELP)]
struct Cli {
    /// Fetch a single URL (e.g. https://example.com)
    #[arg(long, value_name = "URL")]
    url: Option<String>,

    /// Run the built-in target list
    #[arg(long)]
    all: bool,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Per-site timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Skip screenshots (HTML and links only)
    #[arg(long)]
    no_screenshot: bool,

    /// Save HTML and links of pages answering with status >= 400
    #[arg(long)]
    keep_error_pages: bool,

    /// Path to the Chrome/Chromium executable
    #[arg(long, value_name = "PATH")]
    chrome: Option<PathBuf>,

    /// Optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error log output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Ad-hoc targets, used when neither --url nor --all is given
    #[arg(value_name = "TARGETS")]
    targets: Vec<String>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            url: self.url.clone(),
            all: self.all,
            positional: self.targets.clone(),
            output_root: self.out.clone(),
            timeout_secs: self.timeout,
            no_screenshot: self.no_screenshot,
            keep_error_pages: self.keep_error_pages,
            chrome_path: self.chrome.as_ref().map(|p| p.display().to_string()),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let file = match load_optional_config(cli.config.as_deref()) {
        Ok(file) => file,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    let config = match RunConfig::resolve(file, cli.overrides()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::from(1);
        }
    };

    match site_snap::crawler::run(&config).await {
        Ok(report) => {
            println!("\n[+] Done. Summary: {}", report.summary_path.display());
            print_statistics(&report.statistics);
            ExitCode::SUCCESS
        }
        Err(e @ SnapError::CreateDir { .. }) => {
            eprintln!("[-] could not create output directory: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            tracing::error!("Run failed: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_snap=info,warn"),
            1 => EnvFilter::new("site_snap=debug,info"),
            2 => EnvFilter::new("site_snap=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}
