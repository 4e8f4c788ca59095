//! Chart view endpoints.
//!
//! `GET /langfuse/{view}` builds one chart view from the selected trace.

use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::chart::ChartFormat;
use shared::dashboard::{DashboardError, TraceFilter, ViewPayload};
use shared::series::ChartView;

/// Query parameters for chart views.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewParams {
    pub trace_id: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<String>,
    pub session_id: Option<String>,
    pub format: Option<String>,
}

impl ViewParams {
    fn filter(&self) -> TraceFilter {
        TraceFilter {
            trace_id: self.trace_id.clone(),
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
        }
        .normalized()
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ViewError {
    pub error: String,
    pub message: String,
}

type ViewResult = Result<Json<ViewPayload>, (StatusCode, Json<ViewError>)>;

/// Creates the chart view routes.
pub fn langfuse_routes(state: AppState) -> Router {
    Router::new()
        .route("/langfuse/{view}", get(render_view))
        .with_state(state)
}

async fn render_view(
    State(state): State<AppState>,
    Path(view): Path<String>,
    Query(params): Query<ViewParams>,
) -> ViewResult {
    let view: ChartView = view
        .parse()
        .map_err(|e| error_response(&DashboardError::UnknownView(e)))?;
    let format = parse_format(params.format.as_deref())?;
    let filter = params.filter();

    tracing::debug!(%view, %format, ?filter, "Rendering view");

    state
        .dashboard()
        .render(view, &filter, format)
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}

fn parse_format(raw: Option<&str>) -> Result<ChartFormat, (StatusCode, Json<ViewError>)> {
    match raw.map(str::trim) {
        None | Some("" | "raw") => Ok(ChartFormat::Raw),
        Some("apex") => Ok(ChartFormat::Apex),
        Some(other) => Err((
            StatusCode::BAD_REQUEST,
            Json(ViewError {
                error: "bad_request".to_string(),
                message: format!("Unknown format: {other}"),
            }),
        )),
    }
}

fn error_response(err: &DashboardError) -> (StatusCode, Json<ViewError>) {
    let status = match err {
        DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
        DashboardError::UnknownView(_) | DashboardError::UnsupportedFormat { .. } => {
            StatusCode::BAD_REQUEST
        }
        DashboardError::Upstream(source) => {
            tracing::error!(error = %source, "Trace source request failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (
        status,
        Json(ViewError {
            error: err.code().to_string(),
            message: err.to_string(),
        }),
    )
}
