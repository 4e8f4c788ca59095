//! Integration tests for the chart views.
//!
//! Tests cover:
//! - Call counts and summaries for a mixed trace
//! - Missing traces and unknown views
//! - Observations without an end time
//! - Token timeline without the `other` bucket
//! - Trace selection by filters
//! - ApexCharts output

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use shared::models::{Observation, Trace};

use super::common::{generation, get, seed, test_app};

/// Two `m1` generations (1.5s and 2.0s) and one span.
fn mixed_trace_observations(base: chrono::DateTime<Utc>) -> Vec<Observation> {
    vec![
        generation("m1", base, 2000, 4000, (20, 8)),
        Observation::span(base).with_end_time(base + Duration::milliseconds(500)),
        generation("m1", base, 0, 1500, (10, 5)),
    ]
}

#[tokio::test]
async fn test_call_and_summary_views() {
    let (app, source) = test_app();
    let base = Utc::now();
    seed(
        &source,
        Trace::new("trace-a", base),
        mixed_trace_observations(base),
    );

    let (status, calls) = get(app.clone(), "/langfuse/call?traceId=trace-a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls, json!({"m1": 2, "other": 1}));

    let (status, summary) = get(app.clone(), "/langfuse/summary?traceId=trace-a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary, json!({"m1": [3.5, 30, 13, 2]}));

    let (_, latency) = get(app.clone(), "/langfuse/summary-latency?traceId=trace-a").await;
    assert_eq!(latency, json!({"m1": [3.5]}));

    let (_, tokens) = get(app, "/langfuse/summary-token?traceId=trace-a").await;
    assert_eq!(tokens, json!({"m1": [30, 13]}));
}

#[tokio::test]
async fn test_missing_trace_returns_not_found() {
    let (app, _source) = test_app();

    let (status, response) = get(app, "/langfuse/summary?traceId=does-not-exist").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");
    assert!(response.get("m1").is_none());
}

#[tokio::test]
async fn test_unknown_view_returns_bad_request() {
    let (app, _source) = test_app();

    let (status, response) = get(app, "/langfuse/heatmap").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "bad_request");
}

#[tokio::test]
async fn test_missing_end_time_yields_zero_offsets() {
    let (app, source) = test_app();
    let base = Utc::now();
    seed(
        &source,
        Trace::new("trace-c", base),
        vec![Observation::generation("m1", base + Duration::seconds(1))],
    );

    let (status, ranges) = get(app, "/langfuse/latency?traceId=trace-c").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(ranges, json!({"m1": [[0.0, 0.0]], "other": []}));
}

#[tokio::test]
async fn test_token_view_excludes_other() {
    let (app, source) = test_app();
    let base = Utc::now();
    seed(
        &source,
        Trace::new("trace-d", base),
        mixed_trace_observations(base),
    );

    let (status, tokens) = get(app, "/langfuse/token?traceId=trace-d").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(tokens["modelandcount"], json!([{"title": "m1", "cols": 2}]));
    assert_eq!(tokens["timeline"], json!([[0.0, 1.5], [2.0, 4.0]]));
    assert_eq!(tokens["inputTokens"], json!([10, 20]));
    assert_eq!(tokens["outputTokens"], json!([5, 8]));
}

#[tokio::test]
async fn test_latest_trace_is_used_without_trace_id() {
    let (app, source) = test_app();
    let now = Utc::now();
    seed(
        &source,
        Trace::new("old", now - Duration::minutes(10)),
        vec![generation("m-old", now, 0, 100, (1, 1))],
    );
    seed(
        &source,
        Trace::new("new", now),
        vec![generation("m-new", now, 0, 100, (1, 1))],
    );

    let (status, calls) = get(app, "/langfuse/call").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls, json!({"m-new": 1, "other": 0}));
}

#[tokio::test]
async fn test_trace_selected_by_filters() {
    let (app, source) = test_app();
    let now = Utc::now();
    seed(
        &source,
        Trace::new("report", now - Duration::minutes(5))
            .with_name("daily report")
            .with_user_id("alice"),
        vec![generation("m-report", now, 0, 100, (1, 1))],
    );
    seed(
        &source,
        Trace::new("chat", now)
            .with_name("chat")
            .with_user_id("bob")
            .with_session_id("s-1"),
        vec![generation("m-chat", now, 0, 100, (1, 1))],
    );

    let uri = format!(
        "/langfuse/call?name={}",
        urlencoding::encode("daily report")
    );
    let (status, calls) = get(app.clone(), &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls["m-report"], 1);

    let (_, calls) = get(app.clone(), "/langfuse/call?userId=bob&sessionId=s-1").await;
    assert_eq!(calls["m-chat"], 1);

    // Empty values are ignored
    let (_, calls) = get(app.clone(), "/langfuse/call?traceId=&name=").await;
    assert_eq!(calls["m-chat"], 1);

    let (status, _) = get(app, "/langfuse/call?userId=carol").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_trace_id_of_another_user_is_not_found() {
    let (app, source) = test_app();
    let now = Utc::now();
    seed(
        &source,
        Trace::new("trace-alice", now).with_user_id("alice"),
        vec![generation("m1", now, 0, 100, (1, 1))],
    );

    let (status, calls) = get(app.clone(), "/langfuse/call?traceId=trace-alice&userId=alice").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(calls, json!({"m1": 1, "other": 0}));

    let (status, response) = get(app, "/langfuse/call?traceId=trace-alice&userId=bob").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "not_found");
    assert!(response.get("other").is_none());
}

#[tokio::test]
async fn test_apex_format() {
    let (app, source) = test_app();
    let base = Utc::now();
    seed(
        &source,
        Trace::new("trace-apex", base),
        vec![generation("m1", base, 0, 1500, (10, 5))],
    );

    let (status, ranges) = get(app.clone(), "/langfuse/latency?traceId=trace-apex&format=apex").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ranges,
        json!([
            {"name": "m1", "data": [{"x": "Latency", "y": [0.0, 1.5]}]},
            {"name": "other", "data": []}
        ])
    );

    let (status, tokens) = get(
        app.clone(),
        "/langfuse/summary-token?traceId=trace-apex&format=apex",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tokens, json!([{"name": "m1", "data": [10, 5]}]));

    let (status, response) = get(app, "/langfuse/token?traceId=trace-apex&format=apex").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "bad_request");
}
