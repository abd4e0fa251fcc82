//! SQLite persistence layer for the alert pipeline.
//!
//! This crate provides async database operations for disaster events and
//! subscribed users using SQLx with SQLite. Event inserts are deduplicated
//! on the feed link so repeated ingestion of the same feed is idempotent.
//!
//! # Example
//!
//! ```no_run
//! use database::{event, Database, NewEvent};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:alerts.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Store an event; a second insert with the same link is a no-op
//!     let candidate = NewEvent {
//!         source_link: "https://feed.example/event/1".to_string(),
//!         title: "Earthquake in Banda Sea".to_string(),
//!         ..NewEvent::default()
//!     };
//!     let outcome = event::insert_if_new(db.pool(), &candidate).await?;
//!     println!("{outcome:?}");
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod event;
pub mod models;
pub mod user;

pub use error::{DatabaseError, Result};
pub use event::{EventFilter, EventPage, InsertOutcome};
pub use models::{Event, NewEvent, NewUser, User};
pub use user::PreferenceUpdate;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    /// Set high enough that notification fan-out and live subscribers can
    /// read while an ingestion cycle is writing.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/alerts.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_event_and_user_tables_roundtrip() {
        let db = test_db().await;

        // Event side
        let candidate = NewEvent {
            source_link: "https://feed.example/event/1".to_string(),
            title: "Earthquake in Banda Sea".to_string(),
            published_date: chrono::Utc::now(),
            expiry_date: chrono::Utc::now() + chrono::Duration::days(7),
            ..NewEvent::default()
        };
        let outcome = event::insert_if_new(db.pool(), &candidate).await.unwrap();
        let stored = match outcome {
            InsertOutcome::Inserted(e) => e,
            InsertOutcome::AlreadyExists => panic!("first insert must store"),
        };
        let fetched = event::get_event(db.pool(), stored.id).await.unwrap();
        assert_eq!(fetched, stored);

        // User side
        let created = user::create_user(
            db.pool(),
            &NewUser {
                name: "Kim".to_string(),
                email: "kim@example.com".to_string(),
                alert_radius_km: 50.0,
                alerts_enabled: true,
                ..NewUser::default()
            },
        )
        .await
        .unwrap();
        let users = user::list_users(db.pool()).await.unwrap();
        assert_eq!(users, vec![created]);
    }
}
