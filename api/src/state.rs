//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::dashboard::Dashboard;
use shared::source::{InMemoryTraceSource, TraceSource};
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the dashboard, which owns the trace source. Requests share no
/// mutable state.
#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Dashboard>,
}

impl AppState {
    /// Creates a new application state around a dashboard.
    #[must_use]
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard: Arc::new(dashboard),
        }
    }

    /// Creates a new application state reading from the given source.
    #[must_use]
    pub fn with_source(source: Arc<dyn TraceSource>) -> Self {
        Self::new(Dashboard::new(source))
    }

    /// Creates a new application state with an in-memory trace source.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_source(source: Arc<InMemoryTraceSource>) -> Self {
        Self::with_source(source)
    }

    /// Returns a reference to the dashboard.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        self.dashboard.as_ref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_source(InMemoryTraceSource::new_shared())
    }
}
