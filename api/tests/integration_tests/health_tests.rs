//! Integration tests for health check and general API functionality.
//!
//! Tests cover:
//! - Health check endpoint
//! - Empty source behavior

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _source) = test_app();

    let (status, response) = get(app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "llmscope-api");
}

#[tokio::test]
async fn test_empty_source() {
    let (app, _source) = test_app();

    // No trace to build a series from
    let (status, response) = get(app.clone(), "/langfuse/summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");

    // The listing is simply empty
    let (status, response) = get(app, "/langfuse/info").await;
    assert_eq!(status, StatusCode::OK);
    assert!(response.as_object().unwrap().is_empty());
}
