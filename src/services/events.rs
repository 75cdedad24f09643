//! Event store access layer
//!
//! Creation, discovery and moderation of events. Creation is capability
//! checked against the live festMode value; the poster upload happens
//! before the record write, so a failed write can orphan an uploaded file
//! but never leaves a visible event without a durable poster URL.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::database::repositories::{CollegeRepository, EventRepository};
use crate::models::event::{Event, EventStatus, NewEvent};
use crate::models::user::{Role, User};
use crate::services::capabilities::Capabilities;
use crate::services::storage::{ImageUpload, StorageClient};
use crate::utils::errors::{CampusConnectError, Result};

/// Read seam used by the trusted query endpoint.
#[async_trait]
pub trait UpcomingEventsSource: Send + Sync {
    /// Approved events for a college with date >= today, ascending by date.
    async fn list_approved_upcoming(&self, college_id: &str) -> Result<Vec<Event>>;
}

#[derive(Clone)]
pub struct EventService {
    events: EventRepository,
    colleges: CollegeRepository,
    storage: StorageClient,
}

impl EventService {
    pub fn new(
        events: EventRepository,
        colleges: CollegeRepository,
        storage: StorageClient,
    ) -> Self {
        Self {
            events,
            colleges,
            storage,
        }
    }

    /// Create an event on behalf of `actor`.
    ///
    /// collegeAdmin-created events are approved immediately; everything
    /// else (club leads included, festMode or not) enters the approval
    /// queue. This asymmetry is intentional.
    pub async fn create_event(
        &self,
        actor: &User,
        draft: NewEvent,
        poster: &ImageUpload,
    ) -> Result<Event> {
        let fest_mode = self.colleges.fest_mode(&actor.college_id).await?;
        if !Capabilities::resolve(actor.role, fest_mode).can_create_event {
            warn!(uid = %actor.uid, role = %actor.role, fest_mode = fest_mode, "Event creation denied");
            return Err(CampusConnectError::PermissionDenied(
                "Your role cannot create events right now".to_string(),
            ));
        }

        if draft.title.trim().is_empty() || draft.venue.trim().is_empty() {
            return Err(CampusConnectError::InvalidInput(
                "Event title and venue are required".to_string(),
            ));
        }

        let event_id = Uuid::new_v4().to_string();

        // Upload first: an orphaned object after a failed write is
        // acceptable collateral, an event record without a durable poster
        // URL is not.
        let poster_url = self.storage.upload_event_poster(&event_id, poster).await?;

        let status = if actor.role == Role::CollegeAdmin {
            EventStatus::Approved
        } else {
            EventStatus::Pending
        };

        let event = Event {
            id: event_id,
            title: draft.title,
            description: draft.description,
            date: draft.date,
            time: draft.time,
            venue: draft.venue,
            poster_url,
            organizer_id: actor.uid.clone(),
            organizer_name: actor.display_name.clone(),
            college_id: actor.college_id.clone(),
            college_name: actor.college_name.clone(),
            status,
            created_at: Utc::now(),
        };

        self.events
            .insert(&event)
            .await
            .map_err(|e| CampusConnectError::WriteFailed(e.to_string()))?;

        info!(event_id = %event.id, status = %event.status, organizer = %actor.uid, "Event created");
        Ok(event)
    }

    /// Single-entity read; a miss is a user-visible `EventNotFound`.
    pub async fn get_event(&self, event_id: &str) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| CampusConnectError::EventNotFound {
                event_id: event_id.to_string(),
            })
    }

    /// Batched point lookups, chunked at the store's batch limit and
    /// merged; duplicates collapse, unknown ids are omitted.
    pub async fn get_events_by_ids(&self, ids: &[String]) -> Result<Vec<Event>> {
        self.events.find_by_ids(ids).await
    }

    /// The approval queue for a college, oldest pending first. College
    /// admins only, for their own college.
    pub async fn list_pending(&self, actor: &User, college_id: &str) -> Result<Vec<Event>> {
        self.require_moderator(actor, college_id)?;
        self.events.list_pending(college_id).await
    }

    /// Idempotent approve/reject. College admins only, for their own
    /// college; re-applying the current status is a no-op, not an error.
    pub async fn set_event_status(
        &self,
        actor: &User,
        event_id: &str,
        status: EventStatus,
    ) -> Result<Event> {
        if status == EventStatus::Pending {
            return Err(CampusConnectError::InvalidInput(
                "Events cannot be moved back to pending".to_string(),
            ));
        }

        let event = self.get_event(event_id).await?;
        self.require_moderator(actor, &event.college_id)?;

        let updated = self.events.set_status(event_id, status).await?;
        info!(event_id = %event_id, status = %status, moderator = %actor.uid, "Event status set");
        Ok(updated)
    }

    fn require_moderator(&self, actor: &User, college_id: &str) -> Result<()> {
        // festMode never grants moderation, so the flag is irrelevant here.
        if !Capabilities::resolve(actor.role, false).can_moderate {
            return Err(CampusConnectError::PermissionDenied(
                "Only a college admin can moderate events".to_string(),
            ));
        }
        if actor.college_id != college_id {
            return Err(CampusConnectError::PermissionDenied(
                "College admins moderate their own college only".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl UpcomingEventsSource for EventService {
    async fn list_approved_upcoming(&self, college_id: &str) -> Result<Vec<Event>> {
        self.events.list_approved_upcoming(college_id).await
    }
}
