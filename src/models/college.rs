//! College model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A college onboarded by the platform admin.
///
/// `domain` routes sign-in email domains to a college and is unique across
/// the platform. `fest_mode` temporarily grants students event-creation
/// rights and is toggled by the college admin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct College {
    pub id: String,
    pub name: String,
    pub domain: String,
    pub fest_mode: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCollege {
    pub name: String,
    pub domain: String,
}

/// The live per-college settings slice exposed to dashboards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollegeSettings {
    pub fest_mode: bool,
}
