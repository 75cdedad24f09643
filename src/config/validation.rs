//! Configuration validation module
//!
//! Validation happens once at startup; a misconfigured backend credential
//! should fail the process before it serves traffic.

use url::Url;

use super::Settings;
use crate::utils::errors::{CampusConnectError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_storage_config(&settings.storage)?;
    validate_logging_config(&settings.logging)?;
    Ok(())
}

fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(CampusConnectError::Config(
            "Database URL is required".to_string(),
        ));
    }

    if config.max_connections == 0 {
        return Err(CampusConnectError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(CampusConnectError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.token_secret.is_empty() {
        return Err(CampusConnectError::Config(
            "Auth token secret is required".to_string(),
        ));
    }

    Url::parse(&config.provider_url).map_err(|e| {
        CampusConnectError::Config(format!("Invalid auth provider URL: {e}"))
    })?;

    Ok(())
}

fn validate_storage_config(config: &super::StorageConfig) -> Result<()> {
    for (name, value) in [
        ("storage base URL", &config.base_url),
        ("storage public base URL", &config.public_base_url),
    ] {
        Url::parse(value)
            .map_err(|e| CampusConnectError::Config(format!("Invalid {name}: {e}")))?;
    }

    Ok(())
}

fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(CampusConnectError::Config(
            "Log level is required".to_string(),
        ));
    }

    Ok(())
}
