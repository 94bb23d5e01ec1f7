//! HTTP fetcher implementation
//!
//! This module handles the single GET request made for every target:
//! - Building the HTTP client with an identifying user agent
//! - Bounding the request by the per-site deadline
//! - Classifying transport, status and body read failures

use crate::config::UserAgentConfig;
use crate::SnapError;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::time::{timeout_at, Instant};
use tracing::debug;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Response received with a status below 400
    Success {
        /// HTTP status code
        status_code: u16,
        /// HTTP status line, e.g. "200 OK"
        status_text: String,
        /// Raw response body
        body: Vec<u8>,
    },

    /// Response received with a status of 400 or above
    ///
    /// The body was still read and is kept so callers may decide whether
    /// to persist it.
    HttpError {
        status_code: u16,
        status_text: String,
        body: Vec<u8>,
    },

    /// No response: DNS, connect, TLS, timeout or deadline failure
    NetworkError {
        error: SnapError,
    },

    /// Headers were received but reading the body failed
    ReadError {
        status_code: u16,
        status_text: String,
        error: SnapError,
    },
}

impl FetchResult {
    /// Splits the result into status code, status line, body and error
    ///
    /// `HttpError` yields both the body and an error carrying the status
    /// line; callers decide whether such a body is worth persisting.
    pub fn into_parts(self) -> (u16, String, Option<Vec<u8>>, Option<SnapError>) {
        match self {
            Self::Success {
                status_code,
                status_text,
                body,
            } => (status_code, status_text, Some(body), None),
            Self::HttpError {
                status_code,
                status_text,
                body,
            } => {
                let error = SnapError::HttpStatus {
                    status: status_text.clone(),
                };
                (status_code, status_text, Some(body), Some(error))
            }
            Self::NetworkError { error } => (0, String::new(), None, Some(error)),
            Self::ReadError {
                status_code,
                status_text,
                error,
            } => (status_code, status_text, None, Some(error)),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects follow reqwest's default policy.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout for one request
///
/// # Example
///
/// ```no_run
/// use site_snap::config::UserAgentConfig;
/// use site_snap::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(20)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// The client's own timeout applies, and the whole exchange (headers and
/// body) is additionally cut off at `deadline`.
///
/// | Condition | Result |
/// |-----------|--------|
/// | Status < 400 | `Success` |
/// | Status >= 400 | `HttpError`, body kept |
/// | DNS / connect / timeout / deadline | `NetworkError`, status 0 |
/// | Body read failure | `ReadError`, status kept |
pub async fn fetch_page(client: &Client, url: &str, deadline: Instant) -> FetchResult {
    let response = match timeout_at(deadline, client.get(url).send()).await {
        Ok(Ok(response)) => response,
        Ok(Err(e)) => {
            return FetchResult::NetworkError {
                error: classify_request_error(url, &e),
            }
        }
        Err(_) => {
            return FetchResult::NetworkError {
                error: SnapError::Timeout {
                    url: url.to_string(),
                },
            }
        }
    };

    let status = response.status();
    let status_code = status.as_u16();
    let status_text = status_line(status);
    if response.url().as_str() != url {
        debug!(url = %url, final_url = %response.url(), "Followed redirect");
    }

    let body = match timeout_at(deadline, response.bytes()).await {
        Ok(Ok(bytes)) => bytes.to_vec(),
        Ok(Err(e)) => {
            return FetchResult::ReadError {
                status_code,
                status_text,
                error: SnapError::Read(e.to_string()),
            }
        }
        Err(_) => {
            return FetchResult::ReadError {
                status_code,
                status_text,
                error: SnapError::Read("deadline exceeded while reading body".to_string()),
            }
        }
    };

    if status.as_u16() >= 400 {
        return FetchResult::HttpError {
            status_code,
            status_text,
            body,
        };
    }

    FetchResult::Success {
        status_code,
        status_text,
        body,
    }
}

/// Formats a status as "<code> <reason>", e.g. "404 Not Found"
pub fn status_line(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

fn classify_request_error(url: &str, e: &reqwest::Error) -> SnapError {
    if e.is_timeout() {
        SnapError::Timeout {
            url: url.to_string(),
        }
    } else {
        SnapError::Network(e.to_string())
    }
}
