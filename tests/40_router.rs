use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use courses_api::app::{app_with_config, AppState};
use courses_api::auth::{Argon2Params, PasswordHasher};
use courses_api::config::AppConfig;
use courses_api::database::MemoryStore;
use serde_json::Value;
use tower::ServiceExt;

fn router(config: &AppConfig) -> Result<Router> {
    let hasher = PasswordHasher::new(Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })?;
    let state = AppState::new(Arc::new(MemoryStore::new()), hasher);
    Ok(app_with_config(state, config))
}

async fn json_body(response: axum::response::Response) -> Result<Value> {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin() -> Result<()> {
    let config = AppConfig::development();
    let origin = config.security.cors_origins[0].clone();

    let response = router(&config)?
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/courses")
                .header(header::ORIGIN, &origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        origin.as_str()
    );
    Ok(())
}

#[tokio::test]
async fn cors_ignores_unknown_origin() -> Result<()> {
    let config = AppConfig::development();

    let response = router(&config)?
        .oneshot(
            Request::builder()
                .uri("/api/courses")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
    Ok(())
}

#[tokio::test]
async fn oversized_bodies_are_rejected() -> Result<()> {
    let mut config = AppConfig::development();
    config.api.max_request_size_bytes = 64;

    let body = format!(
        r#"{{"firstName":"{}","lastName":"Smith","emailAddress":"a@x.com","password":"pw"}}"#,
        "J".repeat(256)
    );

    let response = router(&config)?
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/users")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(json_body(response).await?["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn unauthenticated_writes_are_denied_before_the_body_is_read() -> Result<()> {
    let config = AppConfig::development();

    let response = router(&config)?
        .oneshot(
            Request::builder()
                .method(Method::PUT)
                .uri("/api/courses/1")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))?,
        )
        .await?;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await?["message"], "Access Denied");
    Ok(())
}
