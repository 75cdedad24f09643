//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod capabilities;
pub mod events;
pub mod hub;
pub mod identity;
pub mod registrations;
pub mod registry;
pub mod storage;

// Re-export commonly used services
pub use auth::{AuthProvider, Credential, Principal, TokenAuthProvider};
pub use capabilities::Capabilities;
pub use events::{EventService, UpcomingEventsSource};
pub use hub::{Change, ChangeHub, Subscription};
pub use identity::{IdentityService, SignedIn};
pub use registrations::RegistrationIndex;
pub use registry::CollegeRegistry;
pub use storage::{ImageUpload, StorageClient};

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub identity: IdentityService,
    pub registry: CollegeRegistry,
    pub events: EventService,
    pub registrations: RegistrationIndex,
    pub auth: Arc<dyn AuthProvider>,
    pub hub: ChangeHub,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(database: DatabaseService, settings: &Settings) -> Result<Self> {
        let hub = ChangeHub::new();
        let storage = StorageClient::new(&settings.storage)?;
        let auth: Arc<dyn AuthProvider> = Arc::new(TokenAuthProvider::new(settings.auth.clone())?);

        let identity = IdentityService::new(
            auth.clone(),
            database.users.clone(),
            database.colleges.clone(),
            storage.clone(),
            hub.clone(),
        );
        let registry = CollegeRegistry::new(database.colleges.clone(), hub.clone());
        let events = EventService::new(
            database.events.clone(),
            database.colleges.clone(),
            storage,
        );
        let registrations = RegistrationIndex::new(database.registrations.clone(), hub.clone());

        Ok(Self {
            identity,
            registry,
            events,
            registrations,
            auth,
            hub,
        })
    }
}
