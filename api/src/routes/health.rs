//! Liveness endpoint.

use axum::{routing::get, Json, Router};
use serde::Serialize;

const SERVICE: &str = "llmscope-api";

/// Body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Creates the `/health` route. It answers without contacting Langfuse.
pub fn health_routes() -> Router {
    Router::new().route(
        "/health",
        get(|| async {
            Json(HealthResponse {
                status: "healthy",
                service: SERVICE,
                version: env!("CARGO_PKG_VERSION"),
            })
        }),
    )
}
