//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request-span middleware)
//!     → handlers.rs (route logic, handler spans, outbound calls)
//!     → error.rs (failures mapped to HTTP statuses)
//! ```

pub mod error;
pub mod handlers;
pub mod server;

pub use error::HandlerError;
pub use server::{AppState, HttpServer};
