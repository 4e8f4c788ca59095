//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared functionality used across all integration tests,
//! including test app setup, trace fixtures and HTTP request helpers.

use api::{create_router, AppState};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, Utc};
use http_body_util::BodyExt;
use serde_json::Value;
use shared::models::{Observation, Trace};
use shared::source::InMemoryTraceSource;
use std::sync::Arc;

/// Creates a test router over a fresh in-memory trace source.
///
/// # Returns
///
/// A tuple containing the configured router and the source to seed.
pub fn test_app() -> (Router, Arc<InMemoryTraceSource>) {
    let source = InMemoryTraceSource::new_shared();
    let router = create_router(AppState::with_in_memory_source(source.clone()));
    (router, source)
}

/// A generation that runs from `start_ms` to `end_ms` after `base`.
pub fn generation(
    model: &str,
    base: DateTime<Utc>,
    start_ms: i64,
    end_ms: i64,
    tokens: (i64, i64),
) -> Observation {
    let start = base + Duration::milliseconds(start_ms);
    #[allow(clippy::cast_precision_loss)]
    let latency = (end_ms - start_ms) as f64;

    Observation::generation(model, start)
        .with_end_time(base + Duration::milliseconds(end_ms))
        .with_latency_ms(latency)
        .with_tokens(tokens.0, tokens.1)
}

/// Seeds one trace with its observations.
pub fn seed(
    source: &InMemoryTraceSource,
    trace: Trace,
    observations: Vec<Observation>,
) {
    let id = trace.id.clone();
    source.insert_trace(trace).unwrap();
    source.insert_observations(&id, observations).unwrap();
}

/// Helper to make a GET request.
///
/// # Arguments
///
/// * `app` - The Axum router to send the request to
/// * `uri` - The URI path to GET from
///
/// # Returns
///
/// A tuple containing the response status code and parsed JSON response body.
pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = tower::ServiceExt::oneshot(
        app,
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
    .unwrap();

    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

    (status, json)
}
