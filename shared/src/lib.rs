//! llmscope Shared Library
//!
//! This crate contains the models, the trace-to-series pipeline and the
//! trace sources used by the llmscope dashboard backend.
//!
//! # Modules
//!
//! - [`models`] - Traces and observations as delivered by the trace store
//! - [`series`] - Model buckets and chart series assemblers
//! - [`source`] - Trace source trait with Langfuse and in-memory implementations
//! - [`dashboard`] - Per-request view rendering
//! - [`chart`] - ApexCharts series shapes
//! - [`config`] - Trace store connection settings
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use shared::models::Observation;
//! use shared::series::{summary_tokens, ModelBuckets};
//!
//! let start = Utc::now();
//! let observations = vec![
//!     Observation::generation("gpt-4o", start)
//!         .with_end_time(start + Duration::seconds(1))
//!         .with_tokens(120, 40),
//! ];
//!
//! let buckets = ModelBuckets::build(&observations, start);
//!
//! assert_eq!(summary_tokens(&buckets)["gpt-4o"], [120, 40]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod models;
pub mod series;
pub mod source;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use indexmap;
pub use serde;
pub use serde_json;
pub use validator;
