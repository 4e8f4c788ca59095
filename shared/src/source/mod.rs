//! Trace sources.
//!
//! This module abstracts the external trace store the dashboard reads from.
//! The `TraceSource` trait defines the three read operations the pipeline
//! needs, with an HTTP implementation for Langfuse and an in-memory one for
//! development and testing.

pub mod langfuse;
pub mod memory;

pub use langfuse::LangfuseClient;
pub use memory::InMemoryTraceSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{Observation, Trace};

/// Errors that can occur while reading from a trace source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Failed to acquire lock on the source.
    #[error("Failed to acquire lock on trace source")]
    LockError,

    /// The HTTP request could not be sent or its body could not be read.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The configured base URL cannot hold an API path.
    #[error("Invalid trace store URL: {0}")]
    InvalidUrl(String),

    /// The trace store answered with a non-success status.
    #[error("GET {url} returned {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },

    /// The response body was not the expected JSON.
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A record was rejected before insertion.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

/// Filters for listing traces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceQuery {
    /// Filter by trace name.
    pub name: Option<String>,

    /// Filter by user id.
    pub user_id: Option<String>,

    /// Filter by session id.
    pub session_id: Option<String>,

    /// Only traces starting at or after this time.
    pub from_timestamp: Option<DateTime<Utc>>,

    /// Maximum number of traces to return.
    pub limit: Option<usize>,
}

impl TraceQuery {
    /// Creates a new empty query (matches all traces).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    /// Sets the earliest trace timestamp.
    #[must_use]
    pub fn with_from_timestamp(mut self, from: DateTime<Utc>) -> Self {
        self.from_timestamp = Some(from);
        self
    }

    /// Sets the maximum number of results.
    #[must_use]
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Filters for listing the observations of a trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservationQuery {
    /// The trace whose observations are listed.
    pub trace_id: String,

    /// Only observations of traces owned by this user.
    pub user_id: Option<String>,
}

impl ObservationQuery {
    /// Creates a query for the observations of one trace.
    #[must_use]
    pub fn new(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            user_id: None,
        }
    }

    /// Sets the user filter.
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// Read access to a trace store.
///
/// Implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait TraceSource: Send + Sync {
    /// Fetches a trace by id.
    ///
    /// Returns `Ok(None)` if the store has no such trace.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or answers with malformed data.
    async fn fetch_trace(&self, trace_id: &str) -> Result<Option<Trace>, SourceError>;

    /// Lists traces matching the query, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or answers with malformed data.
    async fn fetch_traces(&self, query: &TraceQuery) -> Result<Vec<Trace>, SourceError>;

    /// Lists the observations of a trace in the order the store delivers them.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or answers with malformed data.
    async fn fetch_observations(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, SourceError>;
}
