//! Request handlers for the page and the image relay.

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};

use crate::http::error::AppError;
use crate::http::response::image_headers;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::page::CacheBuster;
use crate::upstream::RelayStream;

/// Serve the landing page with a fresh cache-busting token.
pub async fn page_handler(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let token = CacheBuster::now();

    match state.page.render(token) {
        Ok(html) => {
            metrics::record_page_render("ok");
            Ok(Html(html))
        }
        Err(e) => {
            tracing::error!(error = %e, "Error executing HTML template");
            metrics::record_page_render("error");
            Err(AppError::Render(e))
        }
    }
}

/// Fetch one image from the upstream and stream it to the client.
///
/// Once this returns `Ok` the status and headers are fixed; failures while
/// copying the body are only logged (see [`RelayStream`]).
pub async fn image_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    tracing::info!("Request received for image");

    let image = state.upstream.fetch_within(state.request_timeout).await?;
    let content_type = image.content_type().clone();

    tracing::debug!(
        content_type = ?content_type,
        content_length = ?image.content_length(),
        "Relaying upstream image"
    );

    let body = Body::from_stream(RelayStream::new(image.into_stream(), content_type.clone()));
    Ok((image_headers(content_type), body).into_response())
}

/// HEAD on the image route. Nothing is fetched, so there are no image
/// headers to report.
pub async fn image_head_handler() -> impl IntoResponse {
    (StatusCode::METHOD_NOT_ALLOWED, [(header::ALLOW, "GET")])
}
