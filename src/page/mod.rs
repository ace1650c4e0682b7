//! Landing page subsystem.
//!
//! # Data Flow
//! ```text
//! GET /
//!     → token.rs (fresh cache-busting token)
//!     → renderer.rs (startup-parsed template + token)
//!     → text/html response
//! ```
//!
//! Only `/` serves the page. Other paths get 404 and non-GET methods 405
//! instead of falling back to the page.

pub mod renderer;
pub mod token;

pub use renderer::{PageRenderer, RenderError};
pub use token::CacheBuster;
