//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with the four demo routes
//! - Construct the shared outbound HTTP client
//! - Wire up the request-span middleware
//! - Serve on a pre-bound listener until shutdown is triggered
//!
//! # Design Decisions
//! - The listener is bound by the caller, so tests can use ephemeral ports
//! - `TraceLayer` gives every request a framework-level span; handler spans
//!   nest inside it and inherit its trace id

use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::config::ServiceConfig;
use crate::http::handlers;
use crate::lifecycle::ShutdownHandle;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Outbound HTTP client, shared across requests for connection reuse.
    pub client: reqwest::Client,
}

/// HTTP server for the demo service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let state = AppState {
            client: reqwest::Client::new(),
        };
        let router = Self::build_router(state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::root))
            .route("/external", get(handlers::external))
            .route("/slow/{amount}", get(handlers::slow))
            .route("/crash", get(handlers::crash))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener, until
    /// the shutdown handle fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownHandle,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}
