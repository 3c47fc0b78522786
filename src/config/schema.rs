//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files and
//! carry full defaults, so a minimal (or empty) config is valid.

use serde::{Deserialize, Serialize};

/// Root configuration for the demo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Logging and trace-correlation settings.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Service name stamped on every log line.
    pub service_name: String,

    /// Default log filter directive when RUST_LOG is not set.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "trace-sandbox".to_string(),
            level: "trace_sandbox=debug,tower_http=debug".to_string(),
        }
    }
}
