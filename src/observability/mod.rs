//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Handlers produce:
//!     → tracing.rs (spans, each stamped with trace/span ids)
//!     → logging.rs (one JSON line per event on stdout,
//!                   correlated via the enclosing span's ids)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Trace ids are minted at the root span and inherited by children
//! - Span export is out of scope; the ids exist for log correlation

pub mod logging;
pub mod tracing;
