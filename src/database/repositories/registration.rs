//! Registration repository implementation
//!
//! Registrations live in a top-level table keyed by (event_id, user_id),
//! so per-user lookups are a single indexed query instead of a probe
//! across every event.

use sqlx::PgPool;

use crate::models::event::Registration;
use crate::utils::errors::CampusConnectError;

#[derive(Debug, Clone)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Idempotent upsert keyed by (event, user); the server assigns the
    /// registration time and a repeated register keeps the original row.
    pub async fn upsert(
        &self,
        event_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> Result<(), CampusConnectError> {
        sqlx::query(
            r#"
            INSERT INTO registrations (event_id, user_id, display_name, registered_at)
            VALUES ($1, $2, $3, NOW())
            ON CONFLICT (event_id, user_id) DO NOTHING
            "#,
        )
        .bind(event_id)
        .bind(user_id)
        .bind(display_name)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Idempotent delete; absence is not an error.
    pub async fn delete(&self, event_id: &str, user_id: &str) -> Result<(), CampusConnectError> {
        sqlx::query("DELETE FROM registrations WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Check whether a user is registered for an event
    pub async fn exists(&self, event_id: &str, user_id: &str) -> Result<bool, CampusConnectError> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM registrations WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count.0 > 0)
    }

    /// Event ids a user is registered for
    pub async fn event_ids_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<String>, CampusConnectError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT event_id FROM registrations WHERE user_id = $1 ORDER BY registered_at ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|(event_id,)| event_id).collect())
    }

    /// Registrations for an event, earliest first
    pub async fn list_for_event(
        &self,
        event_id: &str,
    ) -> Result<Vec<Registration>, CampusConnectError> {
        let registrations = sqlx::query_as::<_, Registration>(
            "SELECT event_id, user_id, display_name, registered_at \
             FROM registrations WHERE event_id = $1 ORDER BY registered_at ASC",
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }
}
