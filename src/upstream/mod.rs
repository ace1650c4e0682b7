//! Upstream image subsystem.
//!
//! # Data Flow
//! ```text
//! GET /image-from-api
//!     → client.rs (one GET, status check, content type resolution)
//!     → relay.rs (chunk-by-chunk copy into the response body)
//!     → Client
//! ```
//!
//! # Design Decisions
//! - The upstream response is owned by exactly one request; dropping it
//!   on any path releases the connection
//! - Upstream status codes and bodies are never passed through

pub mod client;
pub mod relay;

pub use client::{resolve_content_type, UpstreamClient, UpstreamError, UpstreamImage};
pub use relay::RelayStream;
