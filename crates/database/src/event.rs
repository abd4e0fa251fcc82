//! Event store operations.
//!
//! The ingestion path goes through [`insert_if_new`], which relies on the
//! `UNIQUE(source_link)` constraint for its atomicity: concurrent callers
//! race on a single INSERT and the loser observes the unique violation, so
//! there is no check-then-insert window.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Event, NewEvent};

/// Outcome of an idempotent insert attempt.
///
/// A duplicate is a normal result of polling an overlapping feed window,
/// not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    /// The candidate was new; the stored row is returned.
    Inserted(Event),
    /// An event with the same source link already exists; nothing was
    /// written.
    AlreadyExists,
}

/// Insert a candidate event unless its source link is already stored.
pub async fn insert_if_new(pool: &SqlitePool, candidate: &NewEvent) -> Result<InsertOutcome> {
    let result = sqlx::query(
        r#"
        INSERT INTO events
            (source_link, title, description, lat, lng, alert_type,
             alert_level, country, published_date, expiry_date,
             alert_score, population)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&candidate.source_link)
    .bind(&candidate.title)
    .bind(&candidate.description)
    .bind(candidate.lat)
    .bind(candidate.lng)
    .bind(&candidate.alert_type)
    .bind(&candidate.alert_level)
    .bind(&candidate.country)
    .bind(candidate.published_date)
    .bind(candidate.expiry_date)
    .bind(candidate.alert_score)
    .bind(candidate.population)
    .execute(pool)
    .await;

    match result {
        Ok(done) => Ok(InsertOutcome::Inserted(
            candidate.clone().into_event(done.last_insert_rowid()),
        )),
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Ok(InsertOutcome::AlreadyExists)
        }
        Err(e) => Err(DatabaseError::Sqlx(e)),
    }
}

/// List events published at or after `since`, newest first.
///
/// Used for the backlog replay sent to newly connected live subscribers.
pub async fn list_recent(pool: &SqlitePool, since: DateTime<Utc>) -> Result<Vec<Event>> {
    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, source_link, title, description, lat, lng, alert_type,
               alert_level, country, published_date, expiry_date,
               alert_score, population
        FROM events
        WHERE published_date >= ?
        ORDER BY published_date DESC
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(events)
}

/// Get an event by id.
pub async fn get_event(pool: &SqlitePool, id: i64) -> Result<Event> {
    sqlx::query_as::<_, Event>(
        r#"
        SELECT id, source_link, title, description, lat, lng, alert_type,
               alert_level, country, published_date, expiry_date,
               alert_score, population
        FROM events
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Event",
        id: id.to_string(),
    })
}

/// Delete an event by id.
///
/// The ingestion core never deletes; this exists for the external admin
/// tooling that owns event removal.
pub async fn delete_event(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM events WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Event",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Filter and pagination arguments for the alert listing consumed by the
/// UI collaborator.
#[derive(Debug, Clone)]
pub struct EventFilter {
    /// Case-insensitive substring match against the title.
    pub search: Option<String>,
    /// Exact alert level; the literal value "All" disables the filter.
    pub level: Option<String>,
    /// Lower bound on published date, inclusive.
    pub start_date: Option<DateTime<Utc>>,
    /// Upper bound on published date, inclusive.
    pub end_date: Option<DateTime<Utc>>,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            search: None,
            level: None,
            start_date: None,
            end_date: None,
            page: 1,
            per_page: 20,
        }
    }
}

/// One page of filtered events plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct EventPage {
    pub events: Vec<Event>,
    pub total: i64,
}

/// List events matching `filter`, newest first, with the total number of
/// matches across all pages.
pub async fn list_filtered(pool: &SqlitePool, filter: &EventFilter) -> Result<EventPage> {
    let search = filter.search.as_deref().filter(|s| !s.is_empty());
    let level = filter
        .level
        .as_deref()
        .filter(|l| !l.is_empty() && *l != "All");
    let limit = i64::from(filter.per_page.max(1));
    // Saturates for absurd page numbers; an offset past the end just
    // yields an empty page.
    let offset = i64::from(filter.page.max(1) - 1).saturating_mul(limit);

    let events = sqlx::query_as::<_, Event>(
        r#"
        SELECT id, source_link, title, description, lat, lng, alert_type,
               alert_level, country, published_date, expiry_date,
               alert_score, population
        FROM events
        WHERE (? IS NULL OR title LIKE '%' || ? || '%')
          AND (? IS NULL OR alert_level = ?)
          AND (? IS NULL OR published_date >= ?)
          AND (? IS NULL OR published_date <= ?)
        ORDER BY published_date DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(search)
    .bind(search)
    .bind(level)
    .bind(level)
    .bind(filter.start_date)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.end_date)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    let total = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM events
        WHERE (? IS NULL OR title LIKE '%' || ? || '%')
          AND (? IS NULL OR alert_level = ?)
          AND (? IS NULL OR published_date >= ?)
          AND (? IS NULL OR published_date <= ?)
        "#,
    )
    .bind(search)
    .bind(search)
    .bind(level)
    .bind(level)
    .bind(filter.start_date)
    .bind(filter.start_date)
    .bind(filter.end_date)
    .bind(filter.end_date)
    .fetch_one(pool)
    .await?;

    Ok(EventPage { events, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use chrono::{Duration, TimeZone};

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn candidate(link: &str) -> NewEvent {
        let published = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        NewEvent {
            source_link: link.to_string(),
            title: "Green earthquake alert (Magnitude 4.9M)".to_string(),
            description: "Depth 10km".to_string(),
            lat: Some(-27.5),
            lng: Some(153.0),
            alert_type: "EQ".to_string(),
            alert_level: "Green".to_string(),
            country: "Australia".to_string(),
            published_date: published,
            expiry_date: published + Duration::days(7),
            alert_score: Some(1.4),
            population: 12000,
        }
    }

    #[tokio::test]
    async fn insert_then_duplicate() {
        let db = test_db().await;
        let cand = candidate("https://feed.example/event/1");

        let first = insert_if_new(db.pool(), &cand).await.unwrap();
        let stored = match first {
            InsertOutcome::Inserted(event) => event,
            InsertOutcome::AlreadyExists => panic!("first insert must store"),
        };
        assert_eq!(stored.source_link, cand.source_link);
        assert_eq!(stored.population, 12000);

        let second = insert_if_new(db.pool(), &cand).await.unwrap();
        assert_eq!(second, InsertOutcome::AlreadyExists);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn concurrent_inserts_with_same_link_store_one_row() {
        // A file-backed database so every task gets its own connection;
        // the unique constraint is the only thing arbitrating the race.
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("events.db").display());
        let db = Database::connect(&url).await.unwrap();
        db.migrate().await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = db.pool().clone();
            let cand = candidate("https://feed.example/race");
            handles.push(tokio::spawn(async move {
                insert_if_new(&pool, &cand).await.unwrap()
            }));
        }

        let mut inserted = 0;
        for handle in handles {
            if matches!(handle.await.unwrap(), InsertOutcome::Inserted(_)) {
                inserted += 1;
            }
        }
        assert_eq!(inserted, 1);

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
        db.close().await;
    }

    #[tokio::test]
    async fn list_recent_honors_the_window() {
        let db = test_db().await;
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();

        let mut old = candidate("https://feed.example/old");
        old.published_date = now - Duration::days(10);
        let mut fresh = candidate("https://feed.example/fresh");
        fresh.published_date = now - Duration::days(1);

        insert_if_new(db.pool(), &old).await.unwrap();
        insert_if_new(db.pool(), &fresh).await.unwrap();

        let recent = list_recent(db.pool(), now - Duration::days(7)).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].source_link, "https://feed.example/fresh");
    }

    #[tokio::test]
    async fn get_and_delete_event() {
        let db = test_db().await;
        let cand = candidate("https://feed.example/event/2");

        let stored = match insert_if_new(db.pool(), &cand).await.unwrap() {
            InsertOutcome::Inserted(event) => event,
            InsertOutcome::AlreadyExists => panic!("must insert"),
        };

        let fetched = get_event(db.pool(), stored.id).await.unwrap();
        assert_eq!(fetched, stored);

        delete_event(db.pool(), stored.id).await.unwrap();
        let missing = get_event(db.pool(), stored.id).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
        let gone = delete_event(db.pool(), stored.id).await;
        assert!(matches!(gone, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn filtered_listing_applies_each_criterion() {
        let db = test_db().await;
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();

        let specs = [
            ("https://feed.example/a", "Red tsunami warning", "Red", 0),
            ("https://feed.example/b", "Green EARTHQUAKE alert", "Green", 1),
            ("https://feed.example/c", "Orange flood watch", "Orange", 2),
            ("https://feed.example/d", "Red earthquake alert", "Red", 9),
        ];
        for (link, title, level, day) in specs {
            let mut cand = candidate(link);
            cand.title = title.to_string();
            cand.alert_level = level.to_string();
            cand.published_date = base + Duration::days(day);
            insert_if_new(db.pool(), &cand).await.unwrap();
        }

        // Case-insensitive title search.
        let page = list_filtered(
            db.pool(),
            &EventFilter {
                search: Some("earthquake".to_string()),
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 2);

        // Level filter; "All" disables it.
        let page = list_filtered(
            db.pool(),
            &EventFilter {
                level: Some("Red".to_string()),
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 2);
        let page = list_filtered(
            db.pool(),
            &EventFilter {
                level: Some("All".to_string()),
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 4);

        // Date range, either bound optional.
        let page = list_filtered(
            db.pool(),
            &EventFilter {
                start_date: Some(base + Duration::days(1)),
                end_date: Some(base + Duration::days(2)),
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 2);
        let page = list_filtered(
            db.pool(),
            &EventFilter {
                start_date: Some(base + Duration::days(3)),
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 1);

        // Pagination slices newest-first but reports the full count.
        let page = list_filtered(
            db.pool(),
            &EventFilter {
                page: 2,
                per_page: 3,
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 4);
        assert_eq!(page.events.len(), 1);
        assert_eq!(page.events[0].source_link, "https://feed.example/a");
    }

    #[tokio::test]
    async fn absurd_page_numbers_yield_an_empty_page() {
        let db = test_db().await;
        insert_if_new(db.pool(), &candidate("https://feed.example/only"))
            .await
            .unwrap();

        let page = list_filtered(
            db.pool(),
            &EventFilter {
                page: u32::MAX,
                per_page: u32::MAX,
                ..EventFilter::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.events.is_empty());
    }
}
