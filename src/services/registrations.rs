//! Registration index service
//!
//! Per-user registration state over the denormalized registrations table:
//! register/unregister are idempotent writes, and the live per-user view
//! is a single indexed lookup per refresh instead of a probe across every
//! event. After any register/unregister settles, the subscription
//! converges on the true state.

use std::collections::HashSet;

use tracing::info;

use crate::database::repositories::RegistrationRepository;
use crate::models::event::Registration;
use crate::services::hub::{Change, ChangeHub, Subscription};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct RegistrationIndex {
    registrations: RegistrationRepository,
    hub: ChangeHub,
}

impl RegistrationIndex {
    pub fn new(registrations: RegistrationRepository, hub: ChangeHub) -> Self {
        Self { registrations, hub }
    }

    /// Register a user for an event. Idempotent: a concurrent or repeated
    /// register converges on exactly one record with the original time.
    pub async fn register(
        &self,
        event_id: &str,
        user_id: &str,
        display_name: &str,
    ) -> Result<()> {
        self.registrations
            .upsert(event_id, user_id, display_name)
            .await?;
        info!(event_id = %event_id, user_id = %user_id, "User registered for event");
        self.hub.publish(Change::Registrations {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Remove a registration. Absence is not an error.
    pub async fn unregister(&self, event_id: &str, user_id: &str) -> Result<()> {
        self.registrations.delete(event_id, user_id).await?;
        info!(event_id = %event_id, user_id = %user_id, "User unregistered from event");
        self.hub.publish(Change::Registrations {
            user_id: user_id.to_string(),
        });
        Ok(())
    }

    /// Attendee list for an event, earliest registration first. Shown on
    /// the event detail view to its organizer and moderators.
    pub async fn attendees(&self, event_id: &str) -> Result<Vec<Registration>> {
        self.registrations.list_for_event(event_id).await
    }

    /// One-shot check for a single (event, user) pair.
    pub async fn is_registered(&self, event_id: &str, user_id: &str) -> Result<bool> {
        self.registrations.exists(event_id, user_id).await
    }

    /// One-shot set of event ids the user is registered for.
    pub async fn registered_event_ids(&self, user_id: &str) -> Result<HashSet<String>> {
        Ok(self
            .registrations
            .event_ids_for_user(user_id)
            .await?
            .into_iter()
            .collect())
    }

    /// Live, restartable set of event ids the user is registered for.
    ///
    /// The handle must be dropped before a different user's subscription
    /// is installed in its place; dropping tears the refresh task down so
    /// registrations are never attributed across sessions.
    pub async fn subscribe_user_registrations(
        &self,
        user_id: &str,
    ) -> Result<Subscription<HashSet<String>>> {
        let initial = self.registered_event_ids(user_id).await?;
        let registrations = self.registrations.clone();
        let id_owned = user_id.to_string();
        let filter_id = user_id.to_string();

        Ok(Subscription::spawn(
            &self.hub,
            initial,
            move |change| matches!(change, Change::Registrations { user_id } if *user_id == filter_id),
            move || {
                let registrations = registrations.clone();
                let user_id = id_owned.clone();
                async move {
                    Ok(registrations
                        .event_ids_for_user(&user_id)
                        .await?
                        .into_iter()
                        .collect())
                }
            },
        ))
    }
}
