//! Mapping of handler failures to client responses.
//!
//! Bodies are fixed strings; upstream statuses, upstream bodies and error
//! details stay in the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::page::RenderError;
use crate::upstream::UpstreamError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Body shown to the client.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Render(_) => "Internal Server Error",
            AppError::Upstream(UpstreamError::Status(_)) => "Image source API returned an error",
            AppError::Upstream(_) => "Failed to fetch image from source",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status(), self.public_message()).into_response()
    }
}
