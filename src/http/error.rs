//! Handler error taxonomy.
//!
//! Nothing is recovered locally; every error propagates here and is turned
//! into a server-error response by the `IntoResponse` impl.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors surfaced by request handlers.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// The outbound fetch failed: invalid or unreachable URL, a non-2xx
    /// status, or a body that was not JSON.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    /// Raised unconditionally by the crash endpoint.
    #[error("deliberate failure")]
    Deliberate,
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match &self {
            HandlerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            HandlerError::Deliberate => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::error!(error = %self, status = %status, "Request failed");

        (status, self.to_string()).into_response()
    }
}
