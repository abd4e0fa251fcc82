//! Disaster feed client library.
//!
//! This crate fetches the GDACS RSS feed and normalizes its items into
//! candidate event records:
//!
//! - Fetching raw documents over HTTP (or any [`FeedSource`] impl)
//! - Tolerant per-item parsing with documented defaults
//! - A fixed 7-day expiry horizon for items without an end date
//!
//! # Example
//!
//! ```no_run
//! use feed::{parse_feed, FeedSource, HttpFeedSource, DEFAULT_FEED_URL};
//!
//! # async fn example() -> Result<(), feed::FeedError> {
//! let source = HttpFeedSource::new(DEFAULT_FEED_URL)?;
//! let raw = source.fetch().await?;
//! let candidates = parse_feed(&raw)?;
//! println!("{} candidate events", candidates.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod parser;
pub mod source;

pub use error::FeedError;
pub use parser::parse_feed;
pub use source::{FeedSource, HttpFeedSource, DEFAULT_FEED_URL};
