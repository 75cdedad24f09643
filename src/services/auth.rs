//! Auth provider client
//!
//! The hosted auth provider is modeled as an injectable client: it turns a
//! sign-in credential (bearer ID token or email+password) into a verified
//! principal. The server only ever sees provider-signed tokens; password
//! credentials are exchanged at the provider's REST surface for a token
//! first, then verified like any other.

use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthConfig;
use crate::utils::errors::{CampusConnectError, Result};

/// Sign-in input accepted by the Identity Resolver.
#[derive(Debug, Clone)]
pub enum Credential {
    /// A provider-signed ID token (OAuth assertion).
    IdToken(String),
    /// Email/password pair, exchanged at the provider for a token.
    EmailPassword { email: String, password: String },
}

/// Verified identity attributes asserted by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub email_verified: bool,
}

/// Seam to the hosted auth provider; substitute with a fake in tests.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Authenticate a credential and return the asserted principal.
    async fn authenticate(&self, credential: &Credential) -> Result<Principal>;

    /// Verify a raw bearer token.
    async fn verify_token(&self, token: &str) -> Result<Principal>;
}

/// Claims carried by provider ID tokens.
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    sub: String,
    email: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    picture: Option<String>,
    #[serde(default)]
    email_verified: bool,
    exp: u64,
}

#[derive(Debug, Serialize)]
struct PasswordSignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordSignInResponse {
    id_token: String,
}

/// Production `AuthProvider` backed by HS256 ID tokens and the provider's
/// password sign-in endpoint.
#[derive(Clone)]
pub struct TokenAuthProvider {
    client: Client,
    config: AuthConfig,
    key: DecodingKey,
    validation: Validation,
}

impl TokenAuthProvider {
    pub fn new(config: AuthConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent("CampusConnect/1.0")
            .build()
            .map_err(CampusConnectError::Http)?;

        let key = DecodingKey::from_secret(config.token_secret.as_bytes());
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        Ok(Self {
            client,
            config,
            key,
            validation,
        })
    }

    async fn exchange_password(&self, email: &str, password: &str) -> Result<String> {
        let url = format!(
            "{}/v1/accounts:signInWithPassword",
            self.config.provider_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .json(&PasswordSignInRequest { email, password })
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(email = %email, status = %response.status(), "Password sign-in rejected by provider");
            return Err(CampusConnectError::Unauthenticated(
                "Invalid email or password".to_string(),
            ));
        }

        let body: PasswordSignInResponse = response.json().await?;
        Ok(body.id_token)
    }
}

#[async_trait]
impl AuthProvider for TokenAuthProvider {
    async fn authenticate(&self, credential: &Credential) -> Result<Principal> {
        match credential {
            Credential::IdToken(token) => self.verify_token(token).await,
            Credential::EmailPassword { email, password } => {
                let token = self.exchange_password(email, password).await?;
                self.verify_token(&token).await
            }
        }
    }

    async fn verify_token(&self, token: &str) -> Result<Principal> {
        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "ID token verification failed");
                CampusConnectError::Unauthenticated(format!("Invalid ID token: {e}"))
            })?;

        let claims = data.claims;
        Ok(Principal {
            uid: claims.sub,
            email: claims.email,
            display_name: claims.name,
            photo_url: claims.picture,
            email_verified: claims.email_verified,
        })
    }
}
