//! Instrumented demo HTTP service.
//!
//! Four routes exercise the logging and tracing stack end to end:
//!
//! ```text
//! GET /                  traced no-op, returns {"Hello": "World"}
//! GET /external?url=..   traced outbound fetch, passes upstream JSON through
//! GET /slow/{amount}     traced non-blocking delay of `amount` seconds
//! GET /crash             traced deliberate failure, always a 500
//! ```
//!
//! Every log event is written to stdout as a single JSON line carrying the
//! trace and span ids of the span it fired in, so the four routes can be used
//! to eyeball log/trace correlation without any external collector.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
