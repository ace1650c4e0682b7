//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Upstream image endpoint used when nothing else is configured.
pub const DEFAULT_UPSTREAM_URL: &str = "https://cataas.com/cat";

/// Content type assumed when the upstream omits one.
pub const DEFAULT_FALLBACK_CONTENT_TYPE: &str = "image/jpeg";

/// Root configuration for the server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream image API settings.
    pub upstream: UpstreamConfig,

    /// HTML page settings.
    pub page: PageConfig,

    /// Inbound timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
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

/// Upstream image API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Absolute http(s) URL fetched once per image request.
    pub url: String,

    /// Content type served when the upstream does not declare one.
    pub fallback_content_type: String,

    /// Connection establishment timeout in seconds (transport default when unset).
    pub connect_timeout_secs: Option<u64>,

    /// Total upstream request timeout in seconds (transport default when unset).
    pub timeout_secs: Option<u64>,

    /// User-Agent sent to the upstream.
    pub user_agent: String,

    /// Honor `HTTP_PROXY`/`HTTPS_PROXY`/`NO_PROXY` from the environment.
    pub system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_UPSTREAM_URL.to_string(),
            fallback_content_type: DEFAULT_FALLBACK_CONTENT_TYPE.to_string(),
            connect_timeout_secs: None,
            timeout_secs: None,
            user_agent: concat!("vibe-checker/", env!("CARGO_PKG_VERSION")).to_string(),
            system_proxy: true,
        }
    }
}

/// HTML page configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Text used for the page title and heading.
    pub title: String,

    /// Replacement template loaded once at startup.
    pub template_path: Option<PathBuf>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "cat vibe checker".to_string(),
            template_path: None,
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Time the upstream has to return image response headers, in seconds.
    /// Disabled when unset.
    pub request_secs: Option<u64>,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
