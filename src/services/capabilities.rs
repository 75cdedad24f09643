//! Role-gated dashboard capabilities
//!
//! A pure function of (role, festMode) into a closed capability set. The
//! mapping is re-evaluated per request with the live festMode value and is
//! never cached at login.

use crate::models::user::Role;

/// What a principal may do on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Create events within the user's college.
    pub can_create_event: bool,
    /// Approve or reject pending events.
    pub can_moderate: bool,
    /// Manage college settings (festMode).
    pub can_manage_settings: bool,
    /// Change member roles within the college.
    pub can_manage_roles: bool,
    /// Onboard colleges (platform scope; not a college-level right).
    pub can_manage_colleges: bool,
}

impl Capabilities {
    /// Resolve the capability set for a role under the current festMode.
    ///
    /// Club-lead events still require approval even under festMode; only
    /// collegeAdmin-created events bypass the queue. The webAppAdmin has
    /// platform scope only and creates no events.
    pub fn resolve(role: Role, fest_mode: bool) -> Self {
        match role {
            Role::Student => Self {
                can_create_event: fest_mode,
                can_moderate: false,
                can_manage_settings: false,
                can_manage_roles: false,
                can_manage_colleges: false,
            },
            Role::ClubLead => Self {
                can_create_event: true,
                can_moderate: false,
                can_manage_settings: false,
                can_manage_roles: false,
                can_manage_colleges: false,
            },
            Role::CollegeAdmin => Self {
                can_create_event: true,
                can_moderate: true,
                can_manage_settings: true,
                can_manage_roles: true,
                can_manage_colleges: false,
            },
            Role::WebAppAdmin => Self {
                can_create_event: false,
                can_moderate: false,
                can_manage_settings: false,
                can_manage_roles: false,
                can_manage_colleges: true,
            },
        }
    }
}
