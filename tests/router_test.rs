//! Router tests
//!
//! Exercises the HTTP surface in-process with `tower::ServiceExt::oneshot`;
//! none of these requests reach TMDB.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cineref::config::Config;
use cineref::context::AppContext;
use cineref::reference::NoPreview;
use cineref::server::create_router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test context with the given TOML configuration
fn create_test_context(toml_str: &str) -> AppContext {
    let config: Config = toml::from_str(toml_str).unwrap();
    AppContext::with_previewer(config, None, Arc::new(NoPreview)).unwrap()
}

/// Helper to get response body as JSON
async fn body_json(body: Body) -> serde_json::Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_test_context(""));

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_blank_user_header_is_anonymous() {
    let app = create_router(create_test_context(
        "[users.alice]\nsearch_enabled = \"0\"\n",
    ));

    let response = app
        .clone()
        .oneshot(
            Request::get("/api/reference/provider")
                .header("X-User-Id", "   ")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["search_provider_ids"].as_array().unwrap().len(), 3);

    let response = app
        .oneshot(
            Request::get("/api/reference/provider")
                .header("X-User-Id", "alice")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert!(json["search_provider_ids"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_match_requires_text() {
    let app = create_router(create_test_context(""));

    let response = app
        .oneshot(Request::get("/api/reference/match").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_resolve_unmatched_is_no_content() {
    let app = create_router(create_test_context(""));

    let response = app
        .oneshot(
            Request::get("/api/reference/resolve?text=hello%20world")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_resolve_without_credentials_and_fallback_is_no_content() {
    // no api_key: the TMDB client answers with an error marker locally
    let app = create_router(create_test_context(""));

    let response = app
        .oneshot(
            Request::get("/api/reference/resolve?text=themoviedb.org%2Fmovie%2F603&reference_id=m")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_put_config_rejects_unknown_keys() {
    let app = create_router(create_test_context(""));

    let response = app
        .oneshot(
            Request::put("/api/config")
                .header("X-User-Id", "alice")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"api_key":"user-cannot-set-this"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["code"], "validation_error");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_router(create_test_context(""));

    let response = app
        .oneshot(Request::get("/api/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
