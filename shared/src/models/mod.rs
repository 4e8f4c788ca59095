//! Data models for the llmscope trace dashboard.
//!
//! This module contains the trace and observation records read from the trace store.

pub mod observation;
pub mod trace;

pub use observation::{Observation, ObservationType};
pub use trace::{Trace, TraceInfo, TraceValidationError};
