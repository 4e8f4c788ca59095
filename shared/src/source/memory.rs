//! In-memory trace source for development and testing.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use super::{ObservationQuery, SourceError, TraceQuery, TraceSource};
use crate::models::{Observation, Trace};

/// In-memory trace source.
///
/// Observations are returned in insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTraceSource {
    traces: Arc<RwLock<Vec<Trace>>>,
    observations: Arc<RwLock<Vec<Observation>>>,
}

impl InMemoryTraceSource {
    /// Creates a new empty in-memory trace source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory trace source wrapped in an Arc.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Inserts a trace, replacing any trace with the same id.
    ///
    /// # Errors
    ///
    /// Returns an error if the trace fails validation or the lock is poisoned.
    pub fn insert_trace(&self, trace: Trace) -> Result<(), SourceError> {
        trace
            .validate_trace()
            .map_err(|e| SourceError::InvalidRecord(e.to_string()))?;

        let mut traces = self.traces.write().map_err(|_| SourceError::LockError)?;
        traces.retain(|t| t.id != trace.id);
        traces.push(trace);
        Ok(())
    }

    /// Inserts observations for a trace, stamping each with the trace id.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert_observations(
        &self,
        trace_id: &str,
        new_observations: impl IntoIterator<Item = Observation>,
    ) -> Result<(), SourceError> {
        let mut observations = self
            .observations
            .write()
            .map_err(|_| SourceError::LockError)?;
        observations.extend(
            new_observations
                .into_iter()
                .map(|obs| obs.with_trace_id(trace_id)),
        );
        Ok(())
    }

    /// Returns the number of stored traces.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn trace_count(&self) -> Result<usize, SourceError> {
        let traces = self.traces.read().map_err(|_| SourceError::LockError)?;
        Ok(traces.len())
    }
}

#[async_trait]
impl TraceSource for InMemoryTraceSource {
    async fn fetch_trace(&self, trace_id: &str) -> Result<Option<Trace>, SourceError> {
        let traces = self.traces.read().map_err(|_| SourceError::LockError)?;
        Ok(traces.iter().find(|t| t.id == trace_id).cloned())
    }

    async fn fetch_traces(&self, query: &TraceQuery) -> Result<Vec<Trace>, SourceError> {
        let traces = self.traces.read().map_err(|_| SourceError::LockError)?;

        let mut matching: Vec<Trace> = traces
            .iter()
            .filter(|t| {
                t.matches(
                    query.name.as_deref(),
                    query.user_id.as_deref(),
                    query.session_id.as_deref(),
                )
            })
            .filter(|t| query.from_timestamp.is_none_or(|from| t.timestamp >= from))
            .cloned()
            .collect();

        // Most recent first
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(query.limit.unwrap_or(usize::MAX));

        Ok(matching)
    }

    async fn fetch_observations(
        &self,
        query: &ObservationQuery,
    ) -> Result<Vec<Observation>, SourceError> {
        if let Some(ref user_id) = query.user_id {
            let traces = self.traces.read().map_err(|_| SourceError::LockError)?;
            let owned = traces
                .iter()
                .any(|t| t.id == query.trace_id && t.user_id.as_ref() == Some(user_id));
            if !owned {
                return Ok(Vec::new());
            }
        }

        let observations = self
            .observations
            .read()
            .map_err(|_| SourceError::LockError)?;

        Ok(observations
            .iter()
            .filter(|obs| obs.trace_id.as_deref() == Some(query.trace_id.as_str()))
            .cloned()
            .collect())
    }
}
