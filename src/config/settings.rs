//! Application settings management
//!
//! Configuration is loaded from an optional `config` file plus
//! `CAMPUS_CONNECT_*` environment variables; backend credentials are
//! supplied through the environment, never a runtime-edited file.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// HTTP server configuration for the trusted query endpoint
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Hosted auth provider configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Shared secret used to verify HS256 ID tokens.
    pub token_secret: String,
    /// Base URL of the provider's REST surface (password sign-in).
    pub provider_url: String,
    pub timeout_seconds: u64,
}

/// Object storage configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Base URL objects are written to.
    pub base_url: String,
    /// Base URL embedded into records for public reads.
    pub public_base_url: String,
    pub timeout_seconds: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily-rolling log file; stdout only when unset.
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("CAMPUS_CONNECT").separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::CampusConnectError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/campus_connect".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            auth: AuthConfig {
                token_secret: String::new(),
                provider_url: "https://auth.example.com".to_string(),
                timeout_seconds: 5,
            },
            storage: StorageConfig {
                base_url: "https://storage.example.com/campus-connect".to_string(),
                public_base_url: "https://cdn.example.com/campus-connect".to_string(),
                timeout_seconds: 10,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.database.max_connections, 10);
        assert!(settings.database.url.contains("postgresql://"));
        assert!(settings.logging.file_path.is_none());
    }
}
