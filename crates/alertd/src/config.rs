//! Configuration loaded from environment variables.

use std::env;

/// Alert daemon configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database URL.
    pub database_url: String,
    /// Feed URL to poll.
    pub feed_url: String,
    /// Seconds between ingestion cycles.
    pub poll_interval_secs: u64,
    /// HTTP timeout for one feed fetch.
    pub fetch_timeout_secs: u64,
    /// Days of events replayed to a newly attached subscriber.
    pub backlog_days: i64,
    /// Courier settings; absent means notifications are only logged.
    pub courier: Option<CourierSettings>,
}

/// Courier credentials and template ids.
#[derive(Debug, Clone)]
pub struct CourierSettings {
    pub api_key: String,
    pub email_template: String,
    pub sms_template: String,
    /// Alternate API endpoint, for mock servers.
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SQLITE_PATH` | SQLite database URL | `sqlite:alerts.db?mode=rwc` |
    /// | `FEED_URL` | Disaster feed URL | GDACS public feed |
    /// | `POLL_INTERVAL_SECS` | Seconds between ingestion cycles | `10` |
    /// | `FETCH_TIMEOUT_SECS` | HTTP timeout for one feed fetch | `30` |
    /// | `BACKLOG_DAYS` | Days of backlog replayed to new subscribers | `7` |
    /// | `COURIER_API_KEY` | Courier bearer token | (log-only without it) |
    /// | `COURIER_EMAIL_TEMPLATE` | Courier email template id | (required with key) |
    /// | `COURIER_SMS_TEMPLATE` | Courier SMS template id | (required with key) |
    /// | `COURIER_BASE_URL` | Override Courier endpoint | (Courier production) |
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            env::var("SQLITE_PATH").unwrap_or_else(|_| "sqlite:alerts.db?mode=rwc".to_string());

        let feed_url = env::var("FEED_URL").unwrap_or_else(|_| feed::DEFAULT_FEED_URL.to_string());

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidPollInterval)?;

        let fetch_timeout_secs = env::var("FETCH_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidFetchTimeout)?;

        let backlog_days = env::var("BACKLOG_DAYS")
            .unwrap_or_else(|_| "7".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidBacklogDays)?;

        let courier = match env::var("COURIER_API_KEY") {
            Ok(api_key) => Some(CourierSettings {
                api_key,
                email_template: env::var("COURIER_EMAIL_TEMPLATE")
                    .map_err(|_| ConfigError::MissingCourierTemplate("COURIER_EMAIL_TEMPLATE"))?,
                sms_template: env::var("COURIER_SMS_TEMPLATE")
                    .map_err(|_| ConfigError::MissingCourierTemplate("COURIER_SMS_TEMPLATE"))?,
                base_url: env::var("COURIER_BASE_URL").ok(),
            }),
            Err(_) => None,
        };

        Ok(Self {
            database_url,
            feed_url,
            poll_interval_secs,
            fetch_timeout_secs,
            backlog_days,
            courier,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid POLL_INTERVAL_SECS value")]
    InvalidPollInterval,

    #[error("Invalid FETCH_TIMEOUT_SECS value")]
    InvalidFetchTimeout,

    #[error("Invalid BACKLOG_DAYS value")]
    InvalidBacklogDays,

    #[error("{0} is required when COURIER_API_KEY is set")]
    MissingCourierTemplate(&'static str),
}
