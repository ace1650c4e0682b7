//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with both handlers
//! - Wire up middleware (request ID, tracing)
//! - Build the startup-initialized, read-only application state
//! - Serve on a bound listener until shutdown

use axum::{routing::get, Router};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::http::handlers::{image_handler, image_head_handler, page_handler};
use crate::http::request::{make_request_span, propagate_request_id_layer, set_request_id_layer};
use crate::page::{PageRenderer, RenderError};
use crate::upstream::{UpstreamClient, UpstreamError};

/// Path of the landing page.
pub const PAGE_PATH: &str = "/";

/// Path of the image relay endpoint.
pub const IMAGE_PATH: &str = "/image-from-api";

/// Failures while assembling the server.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("page template: {0}")]
    Template(#[from] RenderError),

    #[error("upstream client: {0}")]
    Upstream(#[from] UpstreamError),
}

/// Application state injected into handlers.
///
/// Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    pub page: Arc<PageRenderer>,
    pub upstream: UpstreamClient,
    /// Deadline for the upstream to produce response headers.
    pub request_timeout: Option<Duration>,
}

impl AppState {
    pub fn new(page: PageRenderer, upstream: UpstreamClient) -> Self {
        Self {
            page: Arc::new(page),
            upstream,
            request_timeout: None,
        }
    }

    pub fn with_request_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Parse the page template and build the upstream client.
    pub fn from_config(config: &AppConfig) -> Result<Self, StartupError> {
        let page = PageRenderer::from_config(&config.page)?;
        let upstream = UpstreamClient::new(&config.upstream)?;
        let timeout = config.timeouts.request_secs.map(Duration::from_secs);
        Ok(Self::new(page, upstream).with_request_timeout(timeout))
    }
}

/// HTTP server for the page and the image relay.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let state = AppState::from_config(config)?;

        tracing::info!(
            upstream = %state.upstream.url(),
            fallback_content_type = %config.upstream.fallback_content_type,
            "Application state ready"
        );

        Ok(Self {
            router: build_router(state),
        })
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires. In-flight responses are drained before returning.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
///
/// HEAD on the image route is answered locally; headers for that route
/// only exist after an upstream fetch.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(PAGE_PATH, get(page_handler))
        .route(IMAGE_PATH, get(image_handler).head(image_head_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
                .layer(propagate_request_id_layer()),
        )
}
