//! Integration tests for the `info` view.

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use serde_json::json;
use shared::models::Trace;

use super::common::{get, seed, test_app};

#[tokio::test]
async fn test_info_lists_recent_traces() {
    let (app, source) = test_app();
    let now = Utc::now();
    seed(
        &source,
        Trace::new("t-1", now - Duration::hours(1))
            .with_name("chat")
            .with_user_id("alice")
            .with_session_id("s-1"),
        vec![],
    );
    seed(&source, Trace::new("t-2", now).with_name("summarize"), vec![]);
    seed(
        &source,
        Trace::new("t-stale", now - Duration::hours(48)).with_name("chat"),
        vec![],
    );

    let (status, info) = get(app, "/langfuse/info").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        info,
        json!({
            "t-2": {"name": "summarize", "userId": null, "sessionId": null},
            "t-1": {"name": "chat", "userId": "alice", "sessionId": "s-1"}
        })
    );
    let keys: Vec<&String> = info.as_object().unwrap().keys().collect();
    assert_eq!(keys.len(), 2);
}

#[tokio::test]
async fn test_info_applies_filters() {
    let (app, source) = test_app();
    let now = Utc::now();
    seed(&source, Trace::new("t-1", now).with_name("chat"), vec![]);
    seed(&source, Trace::new("t-2", now).with_name("summarize"), vec![]);

    let (status, info) = get(app, "/langfuse/info?name=chat").await;

    assert_eq!(status, StatusCode::OK);
    assert!(info.get("t-1").is_some());
    assert!(info.get("t-2").is_none());
}

#[tokio::test]
async fn test_info_has_no_apex_shape() {
    let (app, _source) = test_app();

    let (status, response) = get(app, "/langfuse/info?format=apex").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "bad_request");
}
