//! Chart view selection and payloads.

use serde::Serialize;
use std::str::FromStr;
use thiserror::Error;

use super::assemble::{
    call_counts, range_series, summary, summary_latency, summary_tokens, token_timeline,
    CallCounts, RangeSeries, SummaryLatencySeries, SummarySeries, SummaryTokenSeries,
    TokenTimeline,
};
use super::bucket::ModelBuckets;

/// A view selector that is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown view: {0}")]
pub struct UnknownViewError(pub String);

/// The chart views the dashboard can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    /// Start/end ranges per model (`latency` or `time`).
    Latency,
    /// Token usage over time (`token`).
    Token,
    /// Calls per model (`call`).
    Call,
    /// Latency, tokens and calls per model (`summary`).
    Summary,
    /// Total latency per model (`summary-latency`).
    SummaryLatency,
    /// Total tokens per model (`summary-token`).
    SummaryToken,
    /// Recent trace ids with their selector metadata (`info`).
    Info,
}

impl ChartView {
    /// All views, in selector order.
    pub const ALL: [Self; 7] = [
        Self::Latency,
        Self::Token,
        Self::Call,
        Self::Summary,
        Self::SummaryLatency,
        Self::SummaryToken,
        Self::Info,
    ];

    /// Returns the canonical selector of this view.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Latency => "latency",
            Self::Token => "token",
            Self::Call => "call",
            Self::Summary => "summary",
            Self::SummaryLatency => "summary-latency",
            Self::SummaryToken => "summary-token",
            Self::Info => "info",
        }
    }

    /// Returns true if the view is built from a single trace's observations.
    #[must_use]
    pub const fn is_series(&self) -> bool {
        !matches!(self, Self::Info)
    }
}

impl std::fmt::Display for ChartView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ChartView {
    type Err = UnknownViewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "latency" | "time" => Ok(Self::Latency),
            "token" => Ok(Self::Token),
            "call" => Ok(Self::Call),
            "summary" => Ok(Self::Summary),
            "summary-latency" => Ok(Self::SummaryLatency),
            "summary-token" => Ok(Self::SummaryToken),
            "info" => Ok(Self::Info),
            other => Err(UnknownViewError(other.to_string())),
        }
    }
}

/// The JSON payload of a series view.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesPayload {
    /// `latency` / `time`.
    Range(RangeSeries),
    /// `token`.
    Tokens(TokenTimeline),
    /// `call`.
    Calls(CallCounts),
    /// `summary`.
    Summary(SummarySeries),
    /// `summary-latency`.
    SummaryLatency(SummaryLatencySeries),
    /// `summary-token`.
    SummaryTokens(SummaryTokenSeries),
}

impl SeriesPayload {
    /// Runs the assembler for `view`.
    ///
    /// Returns `None` for views that are not built from buckets.
    #[must_use]
    pub fn assemble(view: ChartView, buckets: &ModelBuckets) -> Option<Self> {
        let payload = match view {
            ChartView::Latency => Self::Range(range_series(buckets)),
            ChartView::Token => Self::Tokens(token_timeline(buckets)),
            ChartView::Call => Self::Calls(call_counts(buckets)),
            ChartView::Summary => Self::Summary(summary(buckets)),
            ChartView::SummaryLatency => Self::SummaryLatency(summary_latency(buckets)),
            ChartView::SummaryToken => Self::SummaryTokens(summary_tokens(buckets)),
            ChartView::Info => return None,
        };
        Some(payload)
    }
}
