//! Structured file writer
//!
//! All artifacts are written whole with `tokio::fs::write`; an existing file
//! from a previous run with the same slug is overwritten.

use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Writes `value` as pretty-printed JSON
pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> OutputResult<()> {
    let json = serde_json::to_vec_pretty(value).map_err(|source| OutputError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    write_bytes(path, &json).await
}

/// Writes one link per line, each newline-terminated
pub async fn write_links(path: &Path, links: &[String]) -> OutputResult<()> {
    write_bytes(path, render_links(links).as_bytes()).await
}

/// Renders links in `links.txt` format
pub fn render_links(links: &[String]) -> String {
    let mut out = String::with_capacity(links.iter().map(|l| l.len() + 1).sum());
    for link in links {
        out.push_str(link);
        out.push('\n');
    }
    out
}

async fn write_bytes(path: &Path, bytes: &[u8]) -> OutputResult<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        })
}
