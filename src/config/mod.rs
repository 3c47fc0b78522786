//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → semantic checks
//!     → ServiceConfig (immutable for the process lifetime)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the service runs with no config file at all
//! - Config is immutable once loaded; there is no reload path

pub mod loader;
pub mod schema;

pub use loader::{load_config, ConfigError};
pub use schema::{ListenerConfig, LoggingConfig, ServiceConfig};
