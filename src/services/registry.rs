//! College registry service
//!
//! Onboarding of colleges by the platform admin, domain routing for
//! sign-in, and per-college settings (festMode) for college admins.

use tracing::{info, warn};

use crate::database::repositories::CollegeRepository;
use crate::models::college::{College, CollegeSettings, NewCollege};
use crate::models::user::User;
use crate::services::capabilities::Capabilities;
use crate::services::hub::{Change, ChangeHub, Subscription};
use crate::utils::errors::{CampusConnectError, Result};

#[derive(Clone)]
pub struct CollegeRegistry {
    colleges: CollegeRepository,
    hub: ChangeHub,
}

impl CollegeRegistry {
    pub fn new(colleges: CollegeRepository, hub: ChangeHub) -> Self {
        Self { colleges, hub }
    }

    /// Onboard a new college. Platform admin only; a domain collision
    /// surfaces as `DuplicateDomain`.
    pub async fn add_college(&self, actor: &User, request: NewCollege) -> Result<College> {
        if !Capabilities::resolve(actor.role, false).can_manage_colleges {
            warn!(uid = %actor.uid, role = %actor.role, "Unauthorized college onboarding attempt");
            return Err(CampusConnectError::PermissionDenied(
                "Only the platform admin can onboard colleges".to_string(),
            ));
        }

        if request.name.trim().is_empty() || !request.domain.contains('.') {
            return Err(CampusConnectError::InvalidInput(
                "College name and a valid domain are required".to_string(),
            ));
        }

        let college = self.colleges.create(request).await?;
        info!(college_id = %college.id, domain = %college.domain, "College onboarded");
        self.hub.publish(Change::Colleges);
        Ok(college)
    }

    /// One-shot list of every college.
    pub async fn list(&self) -> Result<Vec<College>> {
        self.colleges.list().await
    }

    /// College for a sign-in email domain, if any.
    pub async fn find_by_domain(&self, domain: &str) -> Result<Option<College>> {
        self.colleges.find_by_domain(domain).await
    }

    /// Live view of the college list for the admin portal.
    pub async fn subscribe_colleges(&self) -> Result<Subscription<Vec<College>>> {
        let initial = self.colleges.list().await?;
        let colleges = self.colleges.clone();

        Ok(Subscription::spawn(
            &self.hub,
            initial,
            |change| matches!(change, Change::Colleges),
            move || {
                let colleges = colleges.clone();
                async move { colleges.list().await }
            },
        ))
    }

    /// Live view of one college's settings; dashboards re-check festMode
    /// from here on every render rather than caching it at login.
    pub async fn subscribe_settings(
        &self,
        college_id: &str,
    ) -> Result<Subscription<CollegeSettings>> {
        let initial = CollegeSettings {
            fest_mode: self.colleges.fest_mode(college_id).await?,
        };
        let colleges = self.colleges.clone();
        let id_owned = college_id.to_string();
        let filter_id = college_id.to_string();

        Ok(Subscription::spawn(
            &self.hub,
            initial,
            move |change| {
                matches!(change, Change::CollegeSettings { college_id } if *college_id == filter_id)
            },
            move || {
                let colleges = colleges.clone();
                let college_id = id_owned.clone();
                async move {
                    Ok(CollegeSettings {
                        fest_mode: colleges.fest_mode(&college_id).await?,
                    })
                }
            },
        ))
    }

    /// Toggle festMode. College admins only, and only for their own college.
    pub async fn set_fest_mode(
        &self,
        actor: &User,
        college_id: &str,
        enabled: bool,
    ) -> Result<College> {
        if !Capabilities::resolve(actor.role, false).can_manage_settings {
            return Err(CampusConnectError::PermissionDenied(
                "Only a college admin can manage college settings".to_string(),
            ));
        }
        if actor.college_id != college_id {
            return Err(CampusConnectError::PermissionDenied(
                "College admins manage their own college only".to_string(),
            ));
        }

        let college = self.colleges.set_fest_mode(college_id, enabled).await?;
        info!(college_id = %college_id, fest_mode = enabled, actor = %actor.uid, "festMode updated");
        self.hub.publish(Change::CollegeSettings {
            college_id: college_id.to_string(),
        });
        Ok(college)
    }
}
