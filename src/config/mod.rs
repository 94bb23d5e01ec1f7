//! Configuration module for Site-Snap
//!
//! This module resolves the run configuration from three sources, in
//! increasing priority: built-in defaults, an optional TOML file, and the
//! command-line overrides.
//!
//! # Example
//!
//! ```no_run
//! use site_snap::config::{load_config, Overrides, RunConfig};
//! use std::path::Path;
//!
//! let file = load_config(Path::new("site-snap.toml")).unwrap();
//! let config = RunConfig::resolve(file, Overrides::default()).unwrap();
//! println!("Will snapshot {} targets", config.targets.len());
//! ```

mod parser;
mod targets;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, Overrides, RunConfig, RunSection, ScreenshotConfig, UserAgentConfig,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_OUTPUT_ROOT, DEFAULT_SITE_TIMEOUT_SECS,
    DEFAULT_VIEWPORT_HEIGHT, DEFAULT_VIEWPORT_WIDTH,
};

// Re-export parser and target functions
pub use parser::{load_config, load_optional_config};
pub use targets::{default_targets, resolve_targets, DEFAULT_TARGETS};
