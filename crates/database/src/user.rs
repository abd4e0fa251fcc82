//! User CRUD operations.
//!
//! Registration, authentication, and roles are handled by the external
//! account-management collaborators; this module is the shared persistence
//! boundary they go through. The ingestion core itself only calls
//! [`list_users`].

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{NewUser, User};

/// Partial preference update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct PreferenceUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub alert_radius_km: Option<f64>,
    pub alerts_enabled: Option<bool>,
    pub alert_sms: Option<String>,
    pub alert_email: Option<String>,
}

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, new: &NewUser) -> Result<User> {
    let result = sqlx::query(
        r#"
        INSERT INTO users
            (name, email, location, lat, lng, alert_radius_km,
             alerts_enabled, alert_sms, alert_email)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.location)
    .bind(new.lat)
    .bind(new.lng)
    .bind(new.alert_radius_km)
    .bind(new.alerts_enabled)
    .bind(&new.alert_sms)
    .bind(&new.alert_email)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "User",
                    id: new.email.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(new.clone().into_user(result.last_insert_rowid()))
}

/// Get a user by id.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, location, lat, lng, alert_radius_km,
               alerts_enabled, alert_sms, alert_email
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "User",
        id: id.to_string(),
    })
}

/// List all users.
///
/// The ingestion cycle takes this as its point-in-time subscriber
/// snapshot; matching decides per user whether alerts apply.
pub async fn list_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, location, lat, lng, alert_radius_km,
               alerts_enabled, alert_sms, alert_email
        FROM users
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(users)
}

/// Apply a partial preference update to a user.
pub async fn update_preferences(
    pool: &SqlitePool,
    id: i64,
    update: &PreferenceUpdate,
) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET name = COALESCE(?, name),
            email = COALESCE(?, email),
            location = COALESCE(?, location),
            lat = COALESCE(?, lat),
            lng = COALESCE(?, lng),
            alert_radius_km = COALESCE(?, alert_radius_km),
            alerts_enabled = COALESCE(?, alerts_enabled),
            alert_sms = COALESCE(?, alert_sms),
            alert_email = COALESCE(?, alert_email)
        WHERE id = ?
        "#,
    )
    .bind(&update.name)
    .bind(&update.email)
    .bind(&update.location)
    .bind(update.lat)
    .bind(update.lng)
    .bind(update.alert_radius_km)
    .bind(update.alerts_enabled)
    .bind(&update.alert_sms)
    .bind(&update.alert_email)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Delete a user by id.
pub async fn delete_user(pool: &SqlitePool, id: i64) -> Result<()> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "User",
            id: id.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn test_db() -> Database {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();
        db
    }

    fn subscriber(email: &str) -> NewUser {
        NewUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            location: Some("Brisbane".to_string()),
            lat: Some(-27.47),
            lng: Some(153.02),
            alert_radius_km: 50.0,
            alerts_enabled: true,
            alert_sms: None,
            alert_email: None,
        }
    }

    #[tokio::test]
    async fn create_get_list_delete() {
        let db = test_db().await;

        let created = create_user(db.pool(), &subscriber("ana@example.com"))
            .await
            .unwrap();
        assert_eq!(created.email, "ana@example.com");
        assert!(created.alerts_enabled);

        let fetched = get_user(db.pool(), created.id).await.unwrap();
        assert_eq!(fetched, created);

        let users = list_users(db.pool()).await.unwrap();
        assert_eq!(users.len(), 1);

        delete_user(db.pool(), created.id).await.unwrap();
        let missing = get_user(db.pool(), created.id).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let db = test_db().await;

        create_user(db.pool(), &subscriber("ana@example.com"))
            .await
            .unwrap();
        let second = create_user(db.pool(), &subscriber("ana@example.com")).await;
        assert!(matches!(
            second,
            Err(DatabaseError::AlreadyExists { entity: "User", .. })
        ));
    }

    #[tokio::test]
    async fn preference_update_touches_only_provided_fields() {
        let db = test_db().await;
        let created = create_user(db.pool(), &subscriber("ana@example.com"))
            .await
            .unwrap();

        update_preferences(
            db.pool(),
            created.id,
            &PreferenceUpdate {
                alert_radius_km: Some(120.0),
                alerts_enabled: Some(false),
                alert_sms: Some("+61400000000".to_string()),
                ..PreferenceUpdate::default()
            },
        )
        .await
        .unwrap();

        let updated = get_user(db.pool(), created.id).await.unwrap();
        assert_eq!(updated.alert_radius_km, 120.0);
        assert!(!updated.alerts_enabled);
        assert_eq!(updated.alert_sms.as_deref(), Some("+61400000000"));
        // Untouched fields keep their values.
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(updated.lat, Some(-27.47));

        let missing = update_preferences(db.pool(), 9999, &PreferenceUpdate::default()).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound { .. })));
    }
}
