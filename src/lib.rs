//! CampusConnect
//!
//! A college-community event platform: students discover and register for
//! campus events; club leads and college admins create, approve and
//! moderate events; the platform admin onboards colleges. This library
//! provides the data-access layer, role-gated capability logic, live
//! subscriptions, and the trusted upcoming-events query endpoint.

pub mod config;
pub mod database;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{CampusConnectError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
