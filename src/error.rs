//! Error types for the scraping and feed-writing pipeline.

use thiserror::Error;

/// Errors that can occur while fetching pages or writing the feed.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("unexpected status {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// A listing or article URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Reading the sources file or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// RSS serialisation failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// Run summary serialisation failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for ScrapeError {
    fn from(e: quick_xml::Error) -> Self {
        ScrapeError::Xml(e.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ScrapeError>;
