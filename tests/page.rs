//! Tests for the landing page.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use vibe_checker::config::UpstreamConfig;
use vibe_checker::http::{build_router, AppState};
use vibe_checker::page::PageRenderer;
use vibe_checker::upstream::UpstreamClient;

mod common;

use common::spawn_app;

/// Pull the `t` query token out of the page's single `<img src>`.
fn image_token(html: &str) -> String {
    assert_eq!(html.matches("<img").count(), 1, "page must hold exactly one image");
    let start = html
        .find("/image-from-api?t=")
        .expect("image points at the relay endpoint")
        + "/image-from-api?t=".len();
    html[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect()
}

#[tokio::test]
async fn test_page_embeds_relay_image() {
    let app = spawn_app(format!("http://{}/cat", common::unreachable_addr())).await;

    let res = app.get("/").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()[header::CONTENT_TYPE], "text/html; charset=utf-8");
    let html = res.text().await.unwrap();
    assert!(html.contains("<title>cat vibe checker</title>"));
    assert!(!image_token(&html).is_empty());
}

#[tokio::test]
async fn test_token_changes_between_requests() {
    let app = spawn_app(format!("http://{}/cat", common::unreachable_addr())).await;

    let first = image_token(&app.get("/").await.text().await.unwrap());
    let second = image_token(&app.get("/").await.text().await.unwrap());

    assert_ne!(first, second);
    assert!(second.parse::<u64>().unwrap() > first.parse::<u64>().unwrap());
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = spawn_app(format!("http://{}/cat", common::unreachable_addr())).await;
    assert_eq!(app.get("/favicon.ico").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_post_is_not_allowed() {
    let app = spawn_app(format!("http://{}/cat", common::unreachable_addr())).await;
    let res = app.client.post(app.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_render_failure_is_internal_error() {
    let page = PageRenderer::from_template("<p>{{ missing.field }}</p>", "broken").unwrap();
    let upstream = UpstreamClient::new(&UpstreamConfig::default()).unwrap();
    let router = build_router(AppState::new(page, upstream));

    let res = router
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = axum::body::to_bytes(res.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"Internal Server Error");
}
