//! Configuration loading from disk.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ServiceConfig;

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid bind address {address:?}: expected host:port")]
    BindAddress { address: String },
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config)?;

    Ok(config)
}

/// Semantic checks on top of what serde already guarantees.
fn validate_config(config: &ServiceConfig) -> Result<(), ConfigError> {
    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        return Err(ConfigError::BindAddress {
            address: config.listener.bind_address.clone(),
        });
    }
    Ok(())
}
