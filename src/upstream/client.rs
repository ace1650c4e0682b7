//! Upstream image API client.
//!
//! # Responsibilities
//! - Issue exactly one GET per inbound image request
//! - Reject transport failures and any status other than 200
//! - Resolve the content type to serve
//!
//! # Design Decisions
//! - One pooled `reqwest::Client` built at startup and shared by all requests
//! - No retries; timeouts only when configured
//! - The upstream's declared content type is trusted as-is

use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::{Client, Response};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::observability::metrics;

/// Errors from building or calling the upstream client.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The configuration could not produce a client.
    #[error("invalid upstream configuration: {0}")]
    Config(String),

    /// The request never produced a response (DNS, connect, TLS, timeout).
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The upstream answered with something other than 200.
    #[error("upstream returned status {0}")]
    Status(StatusCode),

    /// No response headers arrived before the inbound request deadline.
    #[error("upstream did not respond within {0:?}")]
    Timeout(Duration),
}

/// Client for the single configured upstream endpoint.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
    url: Url,
    fallback_content_type: HeaderValue,
}

impl UpstreamClient {
    /// Build the client from validated configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let url = Url::parse(&config.url)
            .map_err(|e| UpstreamError::Config(format!("url '{}': {}", config.url, e)))?;
        let fallback_content_type = HeaderValue::from_str(config.fallback_content_type.trim())
            .map_err(|e| UpstreamError::Config(format!("fallback content type: {}", e)))?;

        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(secs) = config.connect_timeout_secs {
            builder = builder.connect_timeout(Duration::from_secs(secs));
        }
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder
            .build()
            .map_err(|e| UpstreamError::Config(e.to_string()))?;

        Ok(Self {
            client,
            url,
            fallback_content_type,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Fetch one image. The body has not been read when this returns `Ok`.
    pub async fn fetch(&self) -> Result<UpstreamImage, UpstreamError> {
        let start = Instant::now();

        let response = match self.client.get(self.url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(upstream = %self.url, error = %e, "Failed to get image from upstream");
                metrics::record_upstream_request("transport_error", start);
                return Err(UpstreamError::Transport(e));
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            // Dropping `response` here releases the connection without reading the body.
            tracing::error!(
                upstream = %self.url,
                status = status.as_u16(),
                reason = status.canonical_reason().unwrap_or(""),
                "Upstream request failed with non-200 status"
            );
            metrics::record_upstream_request("bad_status", start);
            return Err(UpstreamError::Status(status));
        }

        let (content_type, fell_back) =
            resolve_content_type(response.headers(), &self.fallback_content_type);
        if fell_back {
            tracing::warn!(
                upstream = %self.url,
                fallback = ?content_type,
                "Upstream did not provide a Content-Type, using fallback"
            );
        }

        metrics::record_upstream_request("ok", start);
        Ok(UpstreamImage {
            content_type,
            response,
        })
    }

    /// Like [`fetch`](Self::fetch), but gives up once `deadline` passes
    /// without response headers. The body is not covered by the deadline.
    pub async fn fetch_within(
        &self,
        deadline: Option<Duration>,
    ) -> Result<UpstreamImage, UpstreamError> {
        let Some(deadline) = deadline else {
            return self.fetch().await;
        };

        let start = Instant::now();
        match tokio::time::timeout(deadline, self.fetch()).await {
            Ok(result) => result,
            Err(_) => {
                tracing::error!(
                    upstream = %self.url,
                    deadline = ?deadline,
                    "Upstream did not respond in time"
                );
                metrics::record_upstream_request("timeout", start);
                Err(UpstreamError::Timeout(deadline))
            }
        }
    }
}

/// Pick the content type to serve: the upstream's, or `fallback` when it is
/// missing or empty. The flag reports whether the fallback was used.
pub fn resolve_content_type(headers: &HeaderMap, fallback: &HeaderValue) -> (HeaderValue, bool) {
    match headers.get(header::CONTENT_TYPE) {
        Some(value) if !value.as_bytes().trim_ascii().is_empty() => (value.clone(), false),
        _ => (fallback.clone(), true),
    }
}

/// A successful upstream response whose body is still unread.
///
/// Dropping it at any point closes the upstream body.
#[derive(Debug)]
pub struct UpstreamImage {
    content_type: HeaderValue,
    response: Response,
}

impl UpstreamImage {
    pub fn content_type(&self) -> &HeaderValue {
        &self.content_type
    }

    /// Length the upstream announced, if any.
    pub fn content_length(&self) -> Option<u64> {
        self.response.content_length()
    }

    /// Consume the image into its body stream.
    pub fn into_stream(self) -> BoxStream<'static, Result<Bytes, reqwest::Error>> {
        self.response.bytes_stream().boxed()
    }
}
