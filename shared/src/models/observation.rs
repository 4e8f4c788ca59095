//! Observation data model.
//!
//! An observation is one step within a trace: an LLM generation call, a
//! non-model span of work, or an event. Observations are created by the trace
//! store and are read-only here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ObservationType {
    /// An LLM inference call.
    Generation,
    /// Non-LLM work.
    #[default]
    Span,
    /// A point-in-time event.
    Event,
    /// Any type this crate does not know about.
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ObservationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Generation => write!(f, "GENERATION"),
            Self::Span => write!(f, "SPAN"),
            Self::Event => write!(f, "EVENT"),
            Self::Other => write!(f, "OTHER"),
        }
    }
}

/// A single step within a trace.
///
/// # Example
///
/// ```
/// use chrono::{Duration, Utc};
/// use shared::models::{Observation, ObservationType};
///
/// let start = Utc::now();
/// let obs = Observation::generation("gpt-4o", start)
///     .with_end_time(start + Duration::milliseconds(1500))
///     .with_latency_ms(1500.0)
///     .with_tokens(120, 48);
///
/// assert_eq!(obs.kind, ObservationType::Generation);
/// assert_eq!(obs.model.as_deref(), Some("gpt-4o"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    /// Observation id.
    #[serde(default)]
    pub id: String,

    /// Id of the owning trace.
    #[serde(default)]
    pub trace_id: Option<String>,

    /// Kind of observation.
    #[serde(rename = "type")]
    pub kind: ObservationType,

    /// Observation name.
    #[serde(default)]
    pub name: Option<String>,

    /// Model identifier, set for generations.
    #[serde(default)]
    pub model: Option<String>,

    /// When the observation started.
    pub start_time: DateTime<Utc>,

    /// When the observation ended, if it has.
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,

    /// Latency in milliseconds.
    #[serde(default, rename = "latency")]
    pub latency_ms: Option<f64>,

    /// Input token count.
    #[serde(default)]
    pub prompt_tokens: Option<i64>,

    /// Output token count.
    #[serde(default)]
    pub completion_tokens: Option<i64>,

    /// Total token count.
    #[serde(default)]
    pub total_tokens: Option<i64>,
}

impl Observation {
    /// Creates a new observation of the given kind.
    #[must_use]
    pub fn new(kind: ObservationType, start_time: DateTime<Utc>) -> Self {
        Self {
            id: String::new(),
            trace_id: None,
            kind,
            name: None,
            model: None,
            start_time,
            end_time: None,
            latency_ms: None,
            prompt_tokens: None,
            completion_tokens: None,
            total_tokens: None,
        }
    }

    /// Creates a generation observation for a model.
    #[must_use]
    pub fn generation(model: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        let mut obs = Self::new(ObservationType::Generation, start_time);
        obs.model = Some(model.into());
        obs
    }

    /// Creates a span observation.
    #[must_use]
    pub fn span(start_time: DateTime<Utc>) -> Self {
        Self::new(ObservationType::Span, start_time)
    }

    /// Sets the observation id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the owning trace id.
    #[must_use]
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    /// Sets the end time.
    #[must_use]
    pub fn with_end_time(mut self, end_time: DateTime<Utc>) -> Self {
        self.end_time = Some(end_time);
        self
    }

    /// Sets the latency in milliseconds.
    #[must_use]
    pub fn with_latency_ms(mut self, latency_ms: f64) -> Self {
        self.latency_ms = Some(latency_ms);
        self
    }

    /// Sets prompt and completion token counts. The total is their sum.
    #[must_use]
    pub fn with_tokens(mut self, prompt: i64, completion: i64) -> Self {
        self.prompt_tokens = Some(prompt);
        self.completion_tokens = Some(completion);
        self.total_tokens = Some(prompt + completion);
        self
    }

    /// Returns true if this observation is an LLM generation.
    #[must_use]
    pub fn is_generation(&self) -> bool {
        self.kind == ObservationType::Generation
    }
}
