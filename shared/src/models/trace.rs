//! Trace data model.
//!
//! A trace is the parent container of observations as delivered by the
//! trace store. It carries the reference time used to turn observation
//! timestamps into trace-relative offsets.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

/// One end-to-end recorded execution, e.g. a user request through an LLM pipeline.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use shared::models::Trace;
///
/// let trace = Trace::new("trace-123", Utc::now())
///     .with_name("chat")
///     .with_user_id("user-1");
///
/// assert!(trace.validate_trace().is_ok());
/// assert_eq!(trace.reference_time(), trace.timestamp);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Trace {
    /// Unique identifier of the trace.
    #[validate(length(min = 1, message = "Trace ID cannot be empty"))]
    pub id: String,

    /// When the trace started.
    pub timestamp: DateTime<Utc>,

    /// When the store created the trace record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// Trace name.
    #[serde(default)]
    pub name: Option<String>,

    /// User the trace belongs to.
    #[serde(default)]
    pub user_id: Option<String>,

    /// Session the trace belongs to.
    #[serde(default)]
    pub session_id: Option<String>,

    /// Total duration of the trace, as reported by the store.
    #[serde(default)]
    pub latency: Option<f64>,
}

/// Errors that can occur during trace validation.
#[derive(Debug, Error)]
pub enum TraceValidationError {
    /// Validation failed with details.
    #[error("Validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),
}

/// Selector metadata for a trace, served by the `info` view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceInfo {
    /// Trace name.
    pub name: Option<String>,
    /// User the trace belongs to.
    pub user_id: Option<String>,
    /// Session the trace belongs to.
    pub session_id: Option<String>,
}

impl Trace {
    /// Creates a new trace with only an id and start timestamp.
    #[must_use]
    pub fn new(id: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            timestamp,
            created_at: None,
            name: None,
            user_id: None,
            session_id: None,
            latency: None,
        }
    }

    /// Sets the trace name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the user id.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Sets the session id.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Sets the creation time.
    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the total latency.
    #[must_use]
    pub fn with_latency(mut self, latency: f64) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Returns the time observation offsets are measured from.
    ///
    /// This is the creation time when the store reports one, otherwise the
    /// trace timestamp.
    #[must_use]
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.created_at.unwrap_or(self.timestamp)
    }

    /// Returns the selector metadata for this trace.
    #[must_use]
    pub fn info(&self) -> TraceInfo {
        TraceInfo {
            name: self.name.clone(),
            user_id: self.user_id.clone(),
            session_id: self.session_id.clone(),
        }
    }

    /// Returns true if the trace matches every filter that is set.
    #[must_use]
    pub fn matches(
        &self,
        name: Option<&str>,
        user_id: Option<&str>,
        session_id: Option<&str>,
    ) -> bool {
        fn field_matches(field: Option<&String>, wanted: Option<&str>) -> bool {
            wanted.is_none_or(|w| field.is_some_and(|f| f == w))
        }

        field_matches(self.name.as_ref(), name)
            && field_matches(self.user_id.as_ref(), user_id)
            && field_matches(self.session_id.as_ref(), session_id)
    }

    /// Validates the trace.
    ///
    /// # Errors
    ///
    /// Returns an error if the trace id is empty.
    pub fn validate_trace(&self) -> Result<(), TraceValidationError> {
        self.validate()?;
        Ok(())
    }
}
