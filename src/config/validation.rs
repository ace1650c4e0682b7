//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, the upstream URL and header values
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::schema::AppConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.url: '{0}' is not an absolute http(s) URL")]
    InvalidUpstreamUrl(String),

    #[error("upstream.fallback_content_type: '{0}' is not a usable header value")]
    InvalidContentType(String),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

/// Check every field that serde cannot check on its own.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match Url::parse(&config.upstream.url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidUpstreamUrl(config.upstream.url.clone())),
    }

    let fallback = config.upstream.fallback_content_type.trim();
    if fallback.is_empty() || HeaderValue::from_str(fallback).is_err() {
        errors.push(ValidationError::InvalidContentType(
            config.upstream.fallback_content_type.clone(),
        ));
    }

    let timeouts = [
        ("upstream.connect_timeout_secs", config.upstream.connect_timeout_secs),
        ("upstream.timeout_secs", config.upstream.timeout_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
    ];
    for (field, value) in timeouts {
        if value == Some(0) {
            errors.push(ValidationError::ZeroTimeout(field));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
