//! Error types for feed.

use thiserror::Error;

/// Errors that can occur while fetching or parsing the feed.
///
/// All of these are transient from the scheduler's point of view: the
/// cycle that hit one is abandoned and the next tick retries.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint answered with a non-success status.
    #[error("Feed returned HTTP {status}")]
    Status { status: u16 },

    /// The document is not well-formed XML.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::DeError),
}
