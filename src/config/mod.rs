//! Configuration management

pub mod settings;
pub mod validation;

pub use settings::{
    AuthConfig, DatabaseConfig, LoggingConfig, ServerConfig, Settings, StorageConfig,
};
