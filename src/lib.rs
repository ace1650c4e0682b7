//! Cat vibe checker: a landing page plus a streaming image relay.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                      ┌──────────────────────────────────────────┐
//!                                  │               VIBE CHECKER               │
//!     GET /  ──────────────────────┼─▶ http::server ──▶ page::renderer        │
//!     ◀── HTML <img src=…?t=token> │                                          │
//!                                  │                                          │
//!     GET /image-from-api ─────────┼─▶ http::server ──▶ upstream::client ─────┼──▶ Upstream
//!     ◀── image bytes ─────────────┼── upstream::relay ◀───────────────────────┼─── image API
//!                                  │                                          │
//!                                  │  config · observability · lifecycle      │
//!                                  └──────────────────────────────────────────┘
//! ```

// Core subsystems
pub mod config;
pub mod http;
pub mod page;
pub mod upstream;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
