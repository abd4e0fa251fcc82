//! Feed document parsing and normalization.
//!
//! Turns a raw RSS document into candidate events. Items the feed got
//! wrong are dropped one by one; only a document that is not XML at all
//! fails the whole parse.

use chrono::{DateTime, Duration, Utc};
use database::NewEvent;
use serde::Deserialize;
use tracing::warn;

use crate::error::FeedError;

/// Horizon applied when an item carries no usable end date.
const EXPIRY_HORIZON_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

/// One feed item as written, before any validation.
///
/// Everything is optional text here; normalization decides what is
/// required and what falls back to a default. The deserializer strips
/// namespace prefixes (`geo:`, `gdacs:`) before matching, so fields bind
/// to local element names.
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    description: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "Point")]
    point: Option<GeoPoint>,
    #[serde(rename = "eventtype")]
    event_type: Option<String>,
    #[serde(rename = "alertlevel")]
    alert_level: Option<String>,
    country: Option<String>,
    #[serde(rename = "alertscore")]
    alert_score: Option<String>,
    #[serde(rename = "todate")]
    to_date: Option<String>,
    population: Option<Population>,
}

#[derive(Debug, Deserialize)]
struct GeoPoint {
    lat: Option<String>,
    long: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Population {
    #[serde(rename = "@value")]
    value: Option<String>,
}

/// Parse a raw feed document into candidate events.
///
/// Malformed items (missing link or title, unparseable publish date) are
/// skipped with a warning and do not affect the remaining items.
pub fn parse_feed(xml: &str) -> Result<Vec<NewEvent>, FeedError> {
    let doc: Rss = quick_xml::de::from_str(xml)?;

    let mut events = Vec::with_capacity(doc.channel.items.len());
    for item in doc.channel.items {
        if let Some(event) = normalize_item(item) {
            events.push(event);
        }
    }

    Ok(events)
}

/// Validate one item and map it onto the canonical record.
fn normalize_item(item: Item) -> Option<NewEvent> {
    let link = match nonempty(item.link) {
        Some(link) => link,
        None => {
            warn!("Skipping feed item without a link");
            return None;
        }
    };

    let title = match nonempty(item.title) {
        Some(title) => title,
        None => {
            warn!("Skipping feed item without a title: {}", link);
            return None;
        }
    };

    let published_date = match item.pub_date.as_deref().and_then(parse_feed_date) {
        Some(date) => date,
        None => {
            warn!("Skipping feed item with unparseable pubDate: {}", link);
            return None;
        }
    };

    let expiry_date = item
        .to_date
        .as_deref()
        .and_then(parse_feed_date)
        .unwrap_or(published_date + Duration::days(EXPIRY_HORIZON_DAYS));

    let (lat, lng) = match item.point {
        Some(point) => (parse_coord(point.lat), parse_coord(point.long)),
        None => (None, None),
    };

    // Parsed through f64 so decimal population values truncate instead
    // of falling back to 0.
    let population = item
        .population
        .and_then(|p| p.value)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .map(|v| v as i64)
        .unwrap_or(0);

    Some(NewEvent {
        source_link: link,
        title,
        description: text_or_empty(item.description),
        lat,
        lng,
        alert_type: text_or_empty(item.event_type),
        alert_level: text_or_empty(item.alert_level),
        country: text_or_empty(item.country),
        published_date,
        expiry_date,
        alert_score: item.alert_score.and_then(|s| s.trim().parse().ok()),
        population,
    })
}

/// Feed timestamps are RFC 2822; some custom GDACS fields use RFC 3339.
fn parse_feed_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|date| date.with_timezone(&Utc))
        .ok()
}

fn parse_coord(raw: Option<String>) -> Option<f64> {
    raw.and_then(|v| v.trim().parse().ok())
}

fn nonempty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn text_or_empty(raw: Option<String>) -> String {
    raw.map(|v| v.trim().to_string()).unwrap_or_default()
}
