//! Evidence collaborators.
//!
//! Phase 1 needs the readable text of each evidence page. Fetchers implement
//! [`EvidenceFetcher`]; failures abort the resolution attempt and leave the
//! oracle untouched.

use async_trait::async_trait;
use thiserror::Error;

mod extract;

#[cfg(feature = "web")]
mod http;

pub use extract::extract_text;

#[cfg(feature = "web")]
pub use http::HttpFetcher;

/// Errors from fetching an evidence page.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Could not read body of {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Whether another attempt could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Timeout { .. } | FetchError::Request { .. } => true,
            FetchError::Status { status, .. } => *status == 429 || *status >= 500,
            FetchError::Body { .. } => false,
        }
    }
}

/// Fetches an evidence URL and returns its readable text.
#[async_trait]
pub trait EvidenceFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    fn name(&self) -> &str;
}

/// Keep at most `max_chars` characters of `text`.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
