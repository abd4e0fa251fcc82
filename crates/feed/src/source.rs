//! Feed source trait and the HTTP implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::error::FeedError;

/// The GDACS global disaster feed.
pub const DEFAULT_FEED_URL: &str = "https://www.gdacs.org/xml/rss.xml";

/// Where the scheduler reads raw feed documents from.
///
/// Abstracted to support different sources (live HTTP, tests, etc.)
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch one raw feed document.
    async fn fetch(&self) -> Result<String, FeedError>;
}

/// Default HTTP timeout for one fetch.
const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Feed source that performs an HTTP GET against a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    http: Client,
    url: String,
}

impl HttpFeedSource {
    /// Create a source for the given feed URL.
    pub fn new(url: impl Into<String>) -> Result<Self, FeedError> {
        Self::with_timeout(url, DEFAULT_FETCH_TIMEOUT)
    }

    /// Create a source with a custom fetch timeout.
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FeedError::Http)?;

        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Get the feed URL this source polls.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self) -> Result<String, FeedError> {
        debug!("Fetching feed: {}", self.url);

        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(FeedError::Http)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(FeedError::Http)?;
        Ok(body)
    }
}
