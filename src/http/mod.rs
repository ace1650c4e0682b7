//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, request span)
//!     → handlers.rs
//!         GET /               → page renderer
//!         GET /image-from-api → upstream client → relay stream
//!     → response.rs / error.rs (headers, generic error bodies)
//!     → Send to client
//! ```

pub mod error;
pub mod handlers;
pub mod request;
pub mod response;
pub mod server;

pub use error::AppError;
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::{build_router, AppState, HttpServer, StartupError, IMAGE_PATH, PAGE_PATH};
