//! Request handlers.
//!
//! Each route exercises one cross-cutting concern end to end: a plain traced
//! response, outbound-call tracing, a non-blocking delay, and an error path.
//! Every handler opens exactly one named span; scoping the work with
//! `Instrument` (or an entered guard) closes the span on every exit path.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, info_span, Instrument};

use crate::http::error::HandlerError;
use crate::http::server::AppState;

/// Query parameters for `GET /external`.
#[derive(Debug, Deserialize)]
pub struct ExternalParams {
    /// Upstream URL to fetch.
    pub url: String,
}

/// `GET /` — hello world inside a span.
pub async fn root() -> Json<Value> {
    info!("Hello, world!");
    let span = info_span!("root", foo = "bar");
    let _guard = span.entered();
    Json(json!({"Hello": "World"}))
}

/// `GET /external?url=<url>` — fetch an upstream URL and pass its JSON body
/// through unmodified.
///
/// No retries and no timeout beyond the client's defaults; any failure
/// propagates as [`HandlerError::Upstream`].
pub async fn external(
    State(state): State<AppState>,
    Query(params): Query<ExternalParams>,
) -> Result<Json<Value>, HandlerError> {
    info!(url = %params.url, "Let's try an external URL");
    let span = info_span!("calling-external", url = %params.url);

    let response = async {
        state
            .client
            .get(params.url.as_str())
            .send()
            .await?
            .error_for_status()
    }
    .instrument(span)
    .await?;

    let body = response.json::<Value>().await?;
    Ok(Json(body))
}

/// `GET /slow/{amount}` — wait `amount` seconds without tying up the runtime.
///
/// The sleep is a suspension point; concurrent requests keep being served.
/// A non-integer path segment is rejected with a 400 before this body runs.
pub async fn slow(Path(amount): Path<u64>) -> Json<Value> {
    let span = info_span!("sleeping", sleep_time = amount);
    tokio::time::sleep(Duration::from_secs(amount))
        .instrument(span)
        .await;
    Json(json!({"slept": amount}))
}

/// `GET /crash` — always fails after opening its span.
pub async fn crash() -> Result<Json<Value>, HandlerError> {
    let span = info_span!("crashing");
    async { Err(HandlerError::Deliberate) }
        .instrument(span)
        .await
}
