//! Trace-to-series aggregation pipeline.
//!
//! Turns the observations of one trace into chart series:
//!
//! 1. [`ModelRegistry::discover`] finds the models used by the trace.
//! 2. [`classify`] assigns each observation to a model bucket.
//! 3. [`ModelBucket::record`] extracts latency, offsets and token counts.
//! 4. An assembler in [`assemble`] projects the buckets into one chart shape.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use shared::models::Observation;
//! use shared::series::{call_counts, ModelBuckets};
//!
//! let start = Utc::now();
//! let observations = vec![
//!     Observation::generation("m1", start).with_end_time(start + Duration::seconds(1)),
//!     Observation::generation("m1", start).with_end_time(start + Duration::seconds(2)),
//!     Observation::span(start),
//! ];
//!
//! let buckets = ModelBuckets::build(&observations, start);
//! let counts = call_counts(&buckets);
//!
//! assert_eq!(counts["m1"], 2);
//! assert_eq!(counts["other"], 1);
//! ```

pub mod align;
pub mod assemble;
pub mod bucket;
pub mod classify;
pub mod time;
pub mod view;

pub use assemble::{
    call_counts, range_series, summary, summary_latency, summary_tokens, token_timeline,
    CallCounts, ModelCount, RangeSeries, SummaryLatencySeries, SummaryRow, SummarySeries,
    SummaryTokenSeries, TokenTimeline,
};
pub use bucket::{ModelBucket, ModelBuckets};
pub use classify::{classify, ModelId, ModelRegistry, OTHER_BUCKET};
pub use view::{ChartView, SeriesPayload, UnknownViewError};
