//! User model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::utils::errors::CampusConnectError;

/// Platform role attached to every user profile.
///
/// `role` and `college_id` are immutable after profile creation except by
/// manual admin action; only `display_name`/`photo_url` are owner-mutable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "student")]
    Student,
    #[serde(rename = "club-lead")]
    ClubLead,
    #[serde(rename = "collegeAdmin")]
    CollegeAdmin,
    #[serde(rename = "webAppAdmin")]
    WebAppAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::ClubLead => "club-lead",
            Role::CollegeAdmin => "collegeAdmin",
            Role::WebAppAdmin => "webAppAdmin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CampusConnectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "club-lead" => Ok(Role::ClubLead),
            "collegeAdmin" => Ok(Role::CollegeAdmin),
            "webAppAdmin" => Ok(Role::WebAppAdmin),
            other => Err(CampusConnectError::InvalidInput(format!(
                "Unknown role: {other}"
            ))),
        }
    }
}

// Roles are persisted as plain text columns.
impl sqlx::Type<sqlx::Postgres> for Role {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <&str as sqlx::Type<sqlx::Postgres>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Postgres> for Role {
    fn encode_by_ref(&self, buf: &mut sqlx::postgres::PgArgumentBuffer) -> sqlx::encode::IsNull {
        <&str as sqlx::Encode<'q, sqlx::Postgres>>::encode_by_ref(&self.as_str(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Role {
    fn decode(
        value: sqlx::postgres::PgValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let text = <&str as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        Ok(text.parse()?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
    pub role: Role,
    pub college_id: String,
    pub college_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: Option<String>,
    pub role: Role,
    pub college_id: String,
    pub college_name: String,
}

/// Owner-mutable profile fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProfileRequest {
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
}
