//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod college;
pub mod event;
pub mod registration;
pub mod user;

// Re-export repositories
pub use college::CollegeRepository;
pub use event::EventRepository;
pub use registration::RegistrationRepository;
pub use user::UserRepository;
