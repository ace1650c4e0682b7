//! Startup orchestration.
//!
//! # Responsibilities
//! - Bind the listener once everything else is ready
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::{AddrParseError, SocketAddr};

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::ListenerConfig;

/// Error type for binding the listener.
#[derive(Debug, Error)]
pub enum BindError {
    #[error("invalid bind address '{address}': {source}")]
    Address {
        address: String,
        #[source]
        source: AddrParseError,
    },

    #[error("failed to bind {address}: {source}")]
    Io {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

/// Bind the TCP listener on the configured address.
pub async fn bind_listener(config: &ListenerConfig) -> Result<TcpListener, BindError> {
    let address: SocketAddr = config
        .bind_address
        .parse()
        .map_err(|source| BindError::Address {
            address: config.bind_address.clone(),
            source,
        })?;

    let listener = TcpListener::bind(address)
        .await
        .map_err(|source| BindError::Io { address, source })?;

    tracing::info!(
        address = %listener.local_addr().unwrap_or(address),
        "Listening for connections"
    );

    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_port() {
        let config = ListenerConfig {
            bind_address: "127.0.0.1:0".into(),
        };
        let listener = bind_listener(&config).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), 0);
    }

    #[tokio::test]
    async fn test_port_in_use_is_io_error() {
        let taken = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let config = ListenerConfig {
            bind_address: taken.local_addr().unwrap().to_string(),
        };

        let err = bind_listener(&config).await.unwrap_err();
        assert!(matches!(err, BindError::Io { .. }));
    }

    #[tokio::test]
    async fn test_unparseable_address() {
        let config = ListenerConfig {
            bind_address: "localhost".into(),
        };
        assert!(matches!(
            bind_listener(&config).await,
            Err(BindError::Address { .. })
        ));
    }
}
