//! Event repository implementation

use futures::future::try_join_all;
use sqlx::PgPool;

use crate::models::event::{Event, EventStatus};
use crate::utils::errors::CampusConnectError;

/// The backing store caps batched id lookups at this many ids per query;
/// larger requests are chunked and merged.
pub const ID_BATCH_LIMIT: usize = 30;

const EVENT_COLUMNS: &str = "id, title, description, date, time, venue, poster_url, \
     organizer_id, organizer_name, college_id, college_name, status, created_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Persist a fully-formed event record
    pub async fn insert(&self, event: &Event) -> Result<(), CampusConnectError> {
        sqlx::query(
            r#"
            INSERT INTO events (id, title, description, date, time, venue, poster_url,
                                organizer_id, organizer_name, college_id, college_name, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(&event.id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.venue)
        .bind(&event.poster_url)
        .bind(&event.organizer_id)
        .bind(&event.organizer_name)
        .bind(&event.college_id)
        .bind(&event.college_name)
        .bind(event.status)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Event>, CampusConnectError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Batched point lookups.
    ///
    /// Duplicate ids collapse to one result and unknown ids are silently
    /// omitted; chunks run concurrently and merge into a single list.
    pub async fn find_by_ids(&self, ids: &[String]) -> Result<Vec<Event>, CampusConnectError> {
        let distinct = dedup_ids(ids);
        if distinct.is_empty() {
            return Ok(Vec::new());
        }

        let queries = distinct.chunks(ID_BATCH_LIMIT).map(|chunk| {
            let chunk: Vec<String> = chunk.to_vec();
            let pool = self.pool.clone();
            async move {
                sqlx::query_as::<_, Event>(&format!(
                    "SELECT {EVENT_COLUMNS} FROM events WHERE id = ANY($1)"
                ))
                .bind(chunk)
                .fetch_all(&pool)
                .await
            }
        });

        let merged: Vec<Event> = try_join_all(queries)
            .await?
            .into_iter()
            .flatten()
            .collect();

        Ok(merged)
    }

    /// Approved events for a college with date >= today (server clock,
    /// date-only granularity), ascending by date.
    pub async fn list_approved_upcoming(
        &self,
        college_id: &str,
    ) -> Result<Vec<Event>, CampusConnectError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE college_id = $1 AND status = $2 AND date >= CURRENT_DATE \
             ORDER BY date ASC, created_at ASC"
        ))
        .bind(college_id)
        .bind(EventStatus::Approved)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// The approval queue: pending events oldest-first, so the review
    /// order is fair.
    pub async fn list_pending(&self, college_id: &str) -> Result<Vec<Event>, CampusConnectError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events \
             WHERE college_id = $1 AND status = $2 \
             ORDER BY created_at ASC"
        ))
        .bind(college_id)
        .bind(EventStatus::Pending)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Idempotent status write
    pub async fn set_status(
        &self,
        event_id: &str,
        status: EventStatus,
    ) -> Result<Event, CampusConnectError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "UPDATE events SET status = $2 WHERE id = $1 RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;

        event.ok_or_else(|| CampusConnectError::EventNotFound {
            event_id: event_id.to_string(),
        })
    }
}

/// Collapse duplicate ids while keeping first-seen order.
fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_ids_keeps_order() {
        let ids: Vec<String> = ["a", "a", "b", "a", "c", "b"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(dedup_ids(&ids), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_chunking_splits_at_batch_limit() {
        let ids: Vec<String> = (0..45).map(|i| format!("event-{i}")).collect();
        let distinct = dedup_ids(&ids);
        let chunks: Vec<_> = distinct.chunks(ID_BATCH_LIMIT).collect();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 30);
        assert_eq!(chunks[1].len(), 15);
    }
}
