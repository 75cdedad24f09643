//! Database module
//!
//! This module handles database connections and operations

pub mod connection;
pub mod repositories;

// Re-export commonly used database components
pub use connection::{create_pool, health_check, run_migrations, DatabasePool};
pub use repositories::{
    CollegeRepository, EventRepository, RegistrationRepository, UserRepository,
};

/// Bundle of all repositories over one pool
#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub colleges: CollegeRepository,
    pub users: UserRepository,
    pub events: EventRepository,
    pub registrations: RegistrationRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            colleges: CollegeRepository::new(pool.clone()),
            users: UserRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool),
        }
    }
}
