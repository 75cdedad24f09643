//! Error handling for CampusConnect
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy. Data-access failures are
//! mapped to a stable kind at the access-layer boundary; the presentation
//! layer owns user-visible messaging.

use thiserror::Error;

/// Main error type for the CampusConnect platform
#[derive(Error, Debug)]
pub enum CampusConnectError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("The email domain '{domain}' is not registered on the platform")]
    DomainNotRegistered { domain: String },

    #[error("A college with domain '{domain}' is already registered")]
    DuplicateDomain { domain: String },

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Poster upload failed: {0}")]
    UploadFailed(String),

    #[error("Event write failed: {0}")]
    WriteFailed(String),

    #[error("User not found: {uid}")]
    UserNotFound { uid: String },

    #[error("College not found: {college_id}")]
    CollegeNotFound { college_id: String },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: String },
}

/// Result type alias for CampusConnect operations
pub type Result<T> = std::result::Result<T, CampusConnectError>;

impl CampusConnectError {
    /// Check if the error is recoverable by resubmitting the same operation.
    ///
    /// Nothing is retried automatically; callers may resubmit recoverable
    /// failures (e.g. a form resubmission after a transient network error).
    pub fn is_recoverable(&self) -> bool {
        match self {
            CampusConnectError::Database(_) => false,
            CampusConnectError::Migration(_) => false,
            CampusConnectError::Http(_) => true,
            CampusConnectError::Serialization(_) => false,
            CampusConnectError::Io(_) => true,
            CampusConnectError::UrlParse(_) => false,
            CampusConnectError::Config(_) => false,
            CampusConnectError::DomainNotRegistered { .. } => false,
            CampusConnectError::DuplicateDomain { .. } => false,
            CampusConnectError::Unauthenticated(_) => false,
            CampusConnectError::PermissionDenied(_) => false,
            CampusConnectError::InvalidInput(_) => false,
            CampusConnectError::UploadFailed(_) => true,
            CampusConnectError::WriteFailed(_) => true,
            CampusConnectError::UserNotFound { .. } => false,
            CampusConnectError::CollegeNotFound { .. } => false,
            CampusConnectError::EventNotFound { .. } => false,
        }
    }

    /// True for failures the submitting user caused and can fix themselves.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CampusConnectError::DomainNotRegistered { .. }
                | CampusConnectError::DuplicateDomain { .. }
                | CampusConnectError::Unauthenticated(_)
                | CampusConnectError::PermissionDenied(_)
                | CampusConnectError::InvalidInput(_)
        )
    }
}
