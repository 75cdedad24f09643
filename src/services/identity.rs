//! Identity resolver service
//!
//! Maps an authenticated principal to a platform profile. Sign-in is gated
//! by the College Registry: an email domain without a registered college is
//! rejected before any profile row exists. First sign-in creates the
//! profile defaulted to the student role, bound to the resolved college.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::database::repositories::{CollegeRepository, UserRepository};
use crate::models::user::{NewUser, Role, UpdateProfileRequest, User};
use crate::services::auth::{AuthProvider, Credential, Principal};
use crate::services::capabilities::Capabilities;
use crate::services::hub::{Change, ChangeHub, Subscription};
use crate::services::storage::{ImageUpload, StorageClient};
use crate::utils::errors::{CampusConnectError, Result};
use crate::utils::helpers::{display_name_from_email, extract_email_domain};

/// Outcome of a successful sign-in: the live profile plus the raw
/// principal asserted by the auth provider.
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub user: User,
    pub principal: Principal,
}

#[derive(Clone)]
pub struct IdentityService {
    auth: Arc<dyn AuthProvider>,
    users: UserRepository,
    colleges: CollegeRepository,
    storage: StorageClient,
    hub: ChangeHub,
}

impl IdentityService {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        users: UserRepository,
        colleges: CollegeRepository,
        storage: StorageClient,
        hub: ChangeHub,
    ) -> Self {
        Self {
            auth,
            users,
            colleges,
            storage,
            hub,
        }
    }

    /// Authenticate a credential and resolve it to a profile.
    ///
    /// The domain check runs before any write: a sign-in from an unmapped
    /// domain fails with `DomainNotRegistered` and creates no user record.
    pub async fn sign_in(&self, credential: &Credential) -> Result<SignedIn> {
        let principal = self.auth.authenticate(credential).await?;
        debug!(uid = %principal.uid, email = %principal.email, "Principal authenticated");

        // Password accounts must confirm their mailbox before they get a
        // session; OAuth assertions arrive pre-verified by the provider.
        if matches!(credential, Credential::EmailPassword { .. }) && !principal.email_verified {
            warn!(uid = %principal.uid, "Unverified email/password sign-in rejected");
            return Err(CampusConnectError::Unauthenticated(
                "Please verify your email address before signing in".to_string(),
            ));
        }

        let domain = extract_email_domain(&principal.email).ok_or_else(|| {
            CampusConnectError::InvalidInput(format!(
                "Malformed email address: {}",
                principal.email
            ))
        })?;

        let college = self
            .colleges
            .find_by_domain(&domain)
            .await?
            .ok_or_else(|| {
                warn!(domain = %domain, "Sign-in from unregistered domain");
                CampusConnectError::DomainNotRegistered { domain: domain.clone() }
            })?;

        let user = match self.users.find_by_uid(&principal.uid).await? {
            Some(existing) => existing,
            None => {
                let display_name = principal
                    .display_name
                    .clone()
                    .unwrap_or_else(|| display_name_from_email(&principal.email));

                let user = self
                    .users
                    .create(NewUser {
                        uid: principal.uid.clone(),
                        display_name,
                        email: principal.email.clone(),
                        photo_url: principal.photo_url.clone(),
                        role: Role::Student,
                        college_id: college.id.clone(),
                        college_name: college.name.clone(),
                    })
                    .await?;

                info!(uid = %user.uid, college = %college.name, "New user profile created");
                self.hub.publish(Change::Profile {
                    uid: user.uid.clone(),
                });
                user
            }
        };

        Ok(SignedIn { user, principal })
    }

    /// One-shot profile fetch.
    pub async fn get_profile(&self, uid: &str) -> Result<User> {
        self.users
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| CampusConnectError::UserNotFound {
                uid: uid.to_string(),
            })
    }

    /// Cancellable live view of a profile, so role/college changes
    /// propagate without a fresh sign-in.
    pub async fn subscribe_profile(&self, uid: &str) -> Result<Subscription<Option<User>>> {
        let initial = self.users.find_by_uid(uid).await?;
        let users = self.users.clone();
        let uid_owned = uid.to_string();
        let filter_uid = uid.to_string();

        Ok(Subscription::spawn(
            &self.hub,
            initial,
            move |change| matches!(change, Change::Profile { uid } if *uid == filter_uid),
            move || {
                let users = users.clone();
                let uid = uid_owned.clone();
                async move { users.find_by_uid(&uid).await }
            },
        ))
    }

    /// Change a member's role between student and club-lead.
    ///
    /// College admins only, within their own college; admin roles are
    /// granted out of band by the platform team. The change is published
    /// so live profile subscriptions pick it up without a fresh sign-in.
    pub async fn set_role(&self, actor: &User, uid: &str, role: Role) -> Result<User> {
        if !Capabilities::resolve(actor.role, false).can_manage_roles {
            return Err(CampusConnectError::PermissionDenied(
                "Only a college admin can change member roles".to_string(),
            ));
        }
        if matches!(role, Role::CollegeAdmin | Role::WebAppAdmin) {
            return Err(CampusConnectError::PermissionDenied(
                "Admin roles are granted by the platform team".to_string(),
            ));
        }

        let target = self.get_profile(uid).await?;
        if target.college_id != actor.college_id {
            return Err(CampusConnectError::PermissionDenied(
                "College admins manage their own college only".to_string(),
            ));
        }

        let user = self.users.set_role(uid, role).await?;
        info!(uid = %uid, role = %role, actor = %actor.uid, "Member role changed");
        self.hub.publish(Change::Profile {
            uid: uid.to_string(),
        });
        Ok(user)
    }

    /// Update the owner-mutable profile fields (display name, photo URL).
    pub async fn update_profile(
        &self,
        uid: &str,
        request: UpdateProfileRequest,
    ) -> Result<User> {
        let user = self.users.update_profile(uid, request).await?;
        info!(uid = %uid, "User profile updated");
        self.hub.publish(Change::Profile {
            uid: uid.to_string(),
        });
        Ok(user)
    }

    /// Upload a new profile picture and point the profile at it.
    pub async fn set_profile_photo(&self, uid: &str, image: &ImageUpload) -> Result<User> {
        let photo_url = self.storage.upload_profile_picture(uid, image).await?;
        self.update_profile(
            uid,
            UpdateProfileRequest {
                display_name: None,
                photo_url: Some(photo_url),
            },
        )
        .await
    }
}
