//! Error taxonomy for the crawl engine.
//!
//! Only fetch-level problems fail a task. Malformed structured-data blocks
//! and unresolvable candidate links are recovered where they occur and never
//! surface here.

use thiserror::Error;

/// Errors that can fail a single fetch attempt. Every variant is retryable
/// up to the configured ceiling; exhausting the ceiling is terminal for the
/// task, not for the run.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure: connect, DNS, timeout, or body read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// The task URL itself does not parse.
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
