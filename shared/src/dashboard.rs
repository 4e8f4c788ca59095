//! Request-scoped view rendering.
//!
//! A [`Dashboard`] answers one view request at a time: select the trace,
//! fetch its observations, build model buckets, and run the assembler the view
//! asks for. Nothing is cached between requests.

use chrono::{Duration, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::chart::{bars, range_bars, summary_bars, ApexSeries, ChartFormat, RANGE_LABEL};
use crate::models::{Trace, TraceInfo};
use crate::series::{ChartView, ModelBuckets, SeriesPayload, UnknownViewError};
use crate::source::{ObservationQuery, SourceError, TraceQuery, TraceSource};

/// Default lookback window of the `info` view, in hours.
pub const DEFAULT_INFO_LOOKBACK_HOURS: i64 = 24;

/// Default number of traces listed by the `info` view.
pub const DEFAULT_INFO_LIMIT: usize = 10;

/// `trace id -> selector metadata`, most recent first.
pub type TraceInfoMap = IndexMap<String, TraceInfo>;

/// Errors that can occur while rendering a view.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// No trace matches the id or filters.
    #[error("No trace found for {0}")]
    NotFound(String),

    /// The view selector is not recognized.
    #[error(transparent)]
    UnknownView(#[from] UnknownViewError),

    /// The view has no chart-library shape.
    #[error("Format {format} is not supported for the {view} view")]
    UnsupportedFormat {
        /// Requested view.
        view: ChartView,
        /// Requested format.
        format: ChartFormat,
    },

    /// The trace source failed.
    #[error("Trace source error: {0}")]
    Upstream(#[from] SourceError),
}

impl DashboardError {
    /// Returns a short machine-readable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::UnknownView(_) | Self::UnsupportedFormat { .. } => "bad_request",
            Self::Upstream(_) => "upstream_error",
        }
    }
}

/// Trace selection filters shared by every view.
///
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceFilter {
    /// Exact trace id. The other filters must still match it.
    pub trace_id: Option<String>,
    /// Trace name.
    pub name: Option<String>,
    /// User id.
    pub user_id: Option<String>,
    /// Session id.
    pub session_id: Option<String>,
}

impl TraceFilter {
    /// Creates a filter that matches the most recent trace.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the trace id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets the name filter.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the user filter.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the session filter.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Returns the filter with empty strings turned into `None`.
    #[must_use]
    pub fn normalized(self) -> Self {
        fn non_empty(value: Option<String>) -> Option<String> {
            value.filter(|v| !v.trim().is_empty())
        }

        Self {
            trace_id: non_empty(self.trace_id),
            name: non_empty(self.name),
            user_id: non_empty(self.user_id),
            session_id: non_empty(self.session_id),
        }
    }

    fn trace_query(&self) -> TraceQuery {
        TraceQuery {
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
            ..TraceQuery::default()
        }
    }

    fn describe(&self) -> String {
        if let Some(ref id) = self.trace_id {
            return format!("id {id}");
        }
        let parts: Vec<String> = [
            ("name", &self.name),
            ("userId", &self.user_id),
            ("sessionId", &self.session_id),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .collect();

        if parts.is_empty() {
            "the latest trace".to_string()
        } else {
            parts.join(", ")
        }
    }
}

/// The JSON payload of any view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ViewPayload {
    /// Model-keyed series.
    Series(SeriesPayload),
    /// Chart-library series.
    Chart(ApexSeries),
    /// Trace selector metadata.
    Info(TraceInfoMap),
}

/// Renders views against a trace source.
#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn TraceSource>,
    info_lookback: Duration,
    info_limit: usize,
}

impl Dashboard {
    /// Creates a dashboard with the default `info` window.
    #[must_use]
    pub fn new(source: Arc<dyn TraceSource>) -> Self {
        Self {
            source,
            info_lookback: Duration::hours(DEFAULT_INFO_LOOKBACK_HOURS),
            info_limit: DEFAULT_INFO_LIMIT,
        }
    }

    /// Sets how far back and how many traces the `info` view lists.
    #[must_use]
    pub fn with_info_window(mut self, lookback: Duration, limit: usize) -> Self {
        self.info_lookback = lookback;
        self.info_limit = limit;
        self
    }

    /// Returns the trace source.
    #[must_use]
    pub fn source(&self) -> &dyn TraceSource {
        self.source.as_ref()
    }

    /// Selects the trace a view is built from.
    ///
    /// An explicit trace id is fetched directly and must still match the
    /// other filters; otherwise the most recent trace matching the filters
    /// is used.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::NotFound`] if no trace matches, or
    /// [`DashboardError::Upstream`] if the source fails.
    pub async fn select_trace(&self, filter: &TraceFilter) -> Result<Trace, DashboardError> {
        let trace = match filter.trace_id {
            Some(ref id) => self.source.fetch_trace(id).await?.filter(|trace| {
                trace.matches(
                    filter.name.as_deref(),
                    filter.user_id.as_deref(),
                    filter.session_id.as_deref(),
                )
            }),
            None => self
                .source
                .fetch_traces(&filter.trace_query().with_limit(1))
                .await?
                .into_iter()
                .next(),
        };

        trace.ok_or_else(|| DashboardError::NotFound(filter.describe()))
    }

    /// Fetches the selected trace's observations and builds its buckets.
    ///
    /// # Errors
    ///
    /// Returns an error if no trace matches or the source fails.
    pub async fn buckets(&self, filter: &TraceFilter) -> Result<ModelBuckets, DashboardError> {
        let trace = self.select_trace(filter).await?;

        let mut query = ObservationQuery::new(trace.id.clone());
        if let Some(ref user_id) = filter.user_id {
            query = query.with_user_id(user_id.clone());
        }
        let observations = self.source.fetch_observations(&query).await?;

        tracing::debug!(
            trace_id = %trace.id,
            observations = observations.len(),
            "Building model buckets"
        );

        Ok(ModelBuckets::build(&observations, trace.reference_time()))
    }

    /// Lists recent traces with their selector metadata.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::Upstream`] if the source fails.
    pub async fn info(&self, filter: &TraceFilter) -> Result<TraceInfoMap, DashboardError> {
        let query = filter
            .trace_query()
            .with_from_timestamp(Utc::now() - self.info_lookback)
            .with_limit(self.info_limit);

        let traces = self.source.fetch_traces(&query).await?;

        Ok(traces
            .into_iter()
            .map(|trace| {
                let info = trace.info();
                (trace.id, info)
            })
            .collect())
    }

    /// Renders one view.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The format is not available for the view
    /// - No trace matches the filters
    /// - The trace source fails
    pub async fn render(
        &self,
        view: ChartView,
        filter: &TraceFilter,
        format: ChartFormat,
    ) -> Result<ViewPayload, DashboardError> {
        let unsupported = || DashboardError::UnsupportedFormat { view, format };

        if format == ChartFormat::Apex
            && matches!(view, ChartView::Token | ChartView::Call | ChartView::Info)
        {
            return Err(unsupported());
        }

        if view == ChartView::Info {
            return Ok(ViewPayload::Info(self.info(filter).await?));
        }

        let buckets = self.buckets(filter).await?;
        let series = SeriesPayload::assemble(view, &buckets).ok_or_else(unsupported)?;

        let payload = match (format, series) {
            (ChartFormat::Raw, series) => ViewPayload::Series(series),
            (ChartFormat::Apex, SeriesPayload::Range(s)) => {
                ViewPayload::Chart(ApexSeries::RangeBar(range_bars(&s, RANGE_LABEL)))
            }
            (ChartFormat::Apex, SeriesPayload::Summary(s)) => {
                ViewPayload::Chart(ApexSeries::Bar(summary_bars(&s)))
            }
            (ChartFormat::Apex, SeriesPayload::SummaryLatency(s)) => {
                ViewPayload::Chart(ApexSeries::Bar(bars(&s)))
            }
            (ChartFormat::Apex, SeriesPayload::SummaryTokens(s)) => {
                ViewPayload::Chart(ApexSeries::Counts(bars(&s)))
            }
            (ChartFormat::Apex, SeriesPayload::Tokens(_) | SeriesPayload::Calls(_)) => {
                return Err(unsupported())
            }
        };

        Ok(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Observation;
    use crate::source::InMemoryTraceSource;

    fn seeded() -> (Dashboard, Arc<InMemoryTraceSource>) {
        let source = InMemoryTraceSource::new_shared();
        let now = Utc::now();

        source
            .insert_trace(Trace::new("older", now - Duration::minutes(5)).with_name("chat"))
            .unwrap();
        source
            .insert_trace(
                Trace::new("latest", now)
                    .with_name("summarize")
                    .with_user_id("alice"),
            )
            .unwrap();
        source
            .insert_observations(
                "older",
                vec![
                    Observation::generation("m1", now - Duration::minutes(5))
                        .with_end_time(now - Duration::minutes(5) + Duration::seconds(2))
                        .with_latency_ms(2000.0),
                ],
            )
            .unwrap();
        source
            .insert_observations(
                "latest",
                vec![
                    Observation::generation("m2", now)
                        .with_end_time(now + Duration::seconds(1))
                        .with_latency_ms(1000.0)
                        .with_tokens(12, 3),
                    Observation::span(now).with_end_time(now + Duration::seconds(3)),
                ],
            )
            .unwrap();

        (Dashboard::new(source.clone()), source)
    }

    #[test]
    fn test_filter_normalized_drops_empty_values() {
        let filter = TraceFilter::new()
            .with_trace_id("")
            .with_name("chat")
            .with_user_id("  ")
            .normalized();

        assert_eq!(filter, TraceFilter::new().with_name("chat"));
    }

    #[test]
    fn test_filter_describe() {
        assert_eq!(TraceFilter::new().describe(), "the latest trace");
        assert_eq!(TraceFilter::new().with_trace_id("t-1").describe(), "id t-1");
        assert_eq!(
            TraceFilter::new()
                .with_name("chat")
                .with_session_id("s")
                .describe(),
            "name=chat, sessionId=s"
        );
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(DashboardError::NotFound("x".into()).code(), "not_found");
        assert_eq!(
            DashboardError::UnknownView(UnknownViewError("x".into())).code(),
            "bad_request"
        );
        assert_eq!(
            DashboardError::Upstream(SourceError::LockError).code(),
            "upstream_error"
        );
    }

    #[tokio::test]
    async fn test_select_trace_by_id_and_latest() {
        let (dashboard, _) = seeded();

        let trace = dashboard
            .select_trace(&TraceFilter::new().with_trace_id("older"))
            .await
            .unwrap();
        assert_eq!(trace.id, "older");

        let trace = dashboard.select_trace(&TraceFilter::new()).await.unwrap();
        assert_eq!(trace.id, "latest");

        let trace = dashboard
            .select_trace(&TraceFilter::new().with_name("chat"))
            .await
            .unwrap();
        assert_eq!(trace.id, "older");
    }

    #[tokio::test]
    async fn test_select_trace_not_found() {
        let (dashboard, _) = seeded();

        let result = dashboard
            .select_trace(&TraceFilter::new().with_trace_id("missing"))
            .await;
        assert!(matches!(result, Err(DashboardError::NotFound(_))));

        let result = dashboard
            .select_trace(&TraceFilter::new().with_session_id("nope"))
            .await;
        assert!(matches!(result, Err(DashboardError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_select_trace_by_id_checks_filters() {
        let (dashboard, _) = seeded();

        let trace = dashboard
            .select_trace(&TraceFilter::new().with_trace_id("latest").with_user_id("alice"))
            .await
            .unwrap();
        assert_eq!(trace.id, "latest");

        let result = dashboard
            .render(
                ChartView::Call,
                &TraceFilter::new().with_trace_id("latest").with_user_id("bob"),
                ChartFormat::Raw,
            )
            .await;
        assert!(matches!(result, Err(DashboardError::NotFound(_))));

        let result = dashboard
            .select_trace(&TraceFilter::new().with_trace_id("older").with_name("summarize"))
            .await;
        assert!(matches!(result, Err(DashboardError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_render_call_view() {
        let (dashboard, _) = seeded();

        let payload = dashboard
            .render(ChartView::Call, &TraceFilter::new(), ChartFormat::Raw)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            serde_json::json!({"m2": 1, "other": 1})
        );
    }

    #[tokio::test]
    async fn test_render_summary_as_apex() {
        let (dashboard, _) = seeded();

        let payload = dashboard
            .render(ChartView::Summary, &TraceFilter::new(), ChartFormat::Apex)
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(payload).unwrap(),
            serde_json::json!([{"name": "m2", "data": [1.0, 12.0, 3.0, 1.0]}])
        );
    }

    #[tokio::test]
    async fn test_render_rejects_apex_for_token_view() {
        let (dashboard, _) = seeded();

        let result = dashboard
            .render(ChartView::Token, &TraceFilter::new(), ChartFormat::Apex)
            .await;

        assert!(matches!(
            result,
            Err(DashboardError::UnsupportedFormat {
                view: ChartView::Token,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_info_lists_recent_traces() {
        let (dashboard, _) = seeded();

        let info = dashboard.info(&TraceFilter::new()).await.unwrap();

        let ids: Vec<&str> = info.keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["latest", "older"]);
        assert_eq!(info["latest"].user_id.as_deref(), Some("alice"));
    }

    #[tokio::test]
    async fn test_info_respects_window() {
        let (dashboard, _) = seeded();
        let dashboard = dashboard.with_info_window(Duration::minutes(1), 10);

        let info = dashboard.info(&TraceFilter::new()).await.unwrap();

        assert_eq!(info.len(), 1);
        assert!(info.contains_key("latest"));
    }
}
