//! Database models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored disaster-alert record, created once per distinct feed link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    /// Store-assigned identity.
    pub id: i64,
    /// The feed item's stable link. Unique; the dedup key.
    pub source_link: String,
    /// Headline from the source feed.
    pub title: String,
    /// Body text from the source feed; empty when the source omits it.
    pub description: String,
    /// Latitude in degrees, when the source provided a parseable value.
    pub lat: Option<f64>,
    /// Longitude in degrees, when the source provided a parseable value.
    pub lng: Option<f64>,
    /// Short source code, e.g. "EQ" or "TC". Stored verbatim, mapped to a
    /// human-readable label only at render time.
    pub alert_type: String,
    /// Severity as reported by the source, conventionally Green/Orange/Red.
    pub alert_level: String,
    /// Affected country, free text.
    pub country: String,
    /// Source publish time.
    pub published_date: DateTime<Utc>,
    /// Source end-of-validity time, or published + 7 days when absent.
    pub expiry_date: DateTime<Utc>,
    /// Source severity score; absent when not parseable.
    pub alert_score: Option<f64>,
    /// Affected population estimate; 0 when not parseable.
    pub population: i64,
}

impl Event {
    /// The event's coordinates, if both are present and usable for
    /// distance math. Events without a valid position are still stored but
    /// never proximity-matched.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if geo::is_valid_coord(lat, lng) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Human-readable label for the stored alert type code.
    pub fn type_label(&self) -> &'static str {
        alert_type_label(&self.alert_type)
    }
}

/// A candidate event normalized from the feed, before the store has
/// assigned it an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewEvent {
    pub source_link: String,
    pub title: String,
    pub description: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alert_type: String,
    pub alert_level: String,
    pub country: String,
    pub published_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub alert_score: Option<f64>,
    pub population: i64,
}

impl Default for NewEvent {
    fn default() -> Self {
        Self {
            source_link: String::new(),
            title: String::new(),
            description: String::new(),
            lat: None,
            lng: None,
            alert_type: String::new(),
            alert_level: String::new(),
            country: String::new(),
            published_date: DateTime::<Utc>::UNIX_EPOCH,
            expiry_date: DateTime::<Utc>::UNIX_EPOCH,
            alert_score: None,
            population: 0,
        }
    }
}

impl NewEvent {
    /// Attach a store-assigned id, producing the persisted form.
    pub fn into_event(self, id: i64) -> Event {
        Event {
            id,
            source_link: self.source_link,
            title: self.title,
            description: self.description,
            lat: self.lat,
            lng: self.lng,
            alert_type: self.alert_type,
            alert_level: self.alert_level,
            country: self.country,
            published_date: self.published_date,
            expiry_date: self.expiry_date,
            alert_score: self.alert_score,
            population: self.population,
        }
    }
}

/// A registered subscriber, as read by the ingestion core.
///
/// Account management owns these rows; the core takes a point-in-time
/// snapshot per ingestion cycle and only ever reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Display label for the subscribed location; ignored by matching.
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Alert radius in kilometres around the subscribed location.
    pub alert_radius_km: f64,
    pub alerts_enabled: bool,
    /// SMS destination; no SMS is sent when absent.
    pub alert_sms: Option<String>,
    /// Override destination for alert emails; falls back to `email`.
    pub alert_email: Option<String>,
}

impl User {
    /// The user's subscribed coordinates, if usable for distance math.
    pub fn position(&self) -> Option<(f64, f64)> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) if geo::is_valid_coord(lat, lng) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Destination address for alert emails: the override when set,
    /// otherwise the account email.
    pub fn notification_email(&self) -> &str {
        self.alert_email.as_deref().unwrap_or(&self.email)
    }
}

/// Fields for creating a new user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alert_radius_km: f64,
    pub alerts_enabled: bool,
    pub alert_sms: Option<String>,
    pub alert_email: Option<String>,
}

impl NewUser {
    /// Attach a store-assigned id, producing the persisted form.
    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            location: self.location,
            lat: self.lat,
            lng: self.lng,
            alert_radius_km: self.alert_radius_km,
            alerts_enabled: self.alerts_enabled,
            alert_sms: self.alert_sms,
            alert_email: self.alert_email,
        }
    }
}

/// Map a source alert-type code to its display label.
///
/// Unmapped codes fall back to "Unknown Alert Type"; the stored code is
/// verbatim either way.
pub fn alert_type_label(code: &str) -> &'static str {
    match code {
        "EQ" => "Earthquake",
        "VO" => "Volcano",
        "TC" => "Tornado",
        "WF" => "Wildfire",
        "DR" => "Drought",
        "FL" => "Flood",
        "TS" => "Tsunami",
        _ => "Unknown Alert Type",
    }
}
