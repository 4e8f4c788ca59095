//! Chart series assembled from model buckets.
//!
//! Each assembler is a pure projection over [`ModelBuckets`]. The token and
//! summary projections cover generation models only; the `other` bucket is
//! dropped by key, never by position.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::align::{apply_permutation, flatten, group, merge_pairs, sort_permutation};
use super::bucket::ModelBuckets;

/// `model -> [[start, end], ...]` in assignment order.
pub type RangeSeries = IndexMap<String, Vec<[f64; 2]>>;

/// `model -> number of observations`.
pub type CallCounts = IndexMap<String, usize>;

/// `model -> [sum latency, sum input tokens, sum output tokens, calls]`.
pub type SummarySeries = IndexMap<String, SummaryRow>;

/// `model -> [sum latency]`.
pub type SummaryLatencySeries = IndexMap<String, [f64; 1]>;

/// `model -> [sum input tokens, sum output tokens]`.
pub type SummaryTokenSeries = IndexMap<String, [i64; 2]>;

/// Aggregate metrics of one model, serialized as a four-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow(pub f64, pub i64, pub i64, pub usize);

impl SummaryRow {
    /// Total latency in seconds.
    #[must_use]
    pub fn latency(&self) -> f64 {
        self.0
    }

    /// Total prompt tokens.
    #[must_use]
    pub fn input_tokens(&self) -> i64 {
        self.1
    }

    /// Total completion tokens.
    #[must_use]
    pub fn output_tokens(&self) -> i64 {
        self.2
    }

    /// Number of calls.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.3
    }
}

/// Group label for the flattened token timeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCount {
    /// Model name.
    pub title: String,
    /// Number of entries the model contributes to the flattened arrays.
    pub cols: usize,
}

/// Token usage over time, flattened across models.
///
/// Entries of one model are contiguous and sorted by start offset;
/// `modelandcount` lists the models in the same order with their entry counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenTimeline {
    /// `[start, end]` offsets of every generation.
    pub timeline: Vec<[f64; 2]>,
    /// Prompt tokens, aligned with `timeline`.
    pub input_tokens: Vec<i64>,
    /// Completion tokens, aligned with `timeline`.
    pub output_tokens: Vec<i64>,
    /// Model labels and entry counts.
    pub modelandcount: Vec<ModelCount>,
}

impl TokenTimeline {
    fn counts(&self) -> Vec<usize> {
        self.modelandcount.iter().map(|m| m.cols).collect()
    }

    /// Splits the flattened timeline back into per-model groups.
    #[must_use]
    pub fn grouped_timeline(&self) -> Vec<Vec<[f64; 2]>> {
        group(&self.timeline, &self.counts())
    }

    /// Splits the flattened prompt tokens back into per-model groups.
    #[must_use]
    pub fn grouped_input_tokens(&self) -> Vec<Vec<i64>> {
        group(&self.input_tokens, &self.counts())
    }

    /// Splits the flattened completion tokens back into per-model groups.
    #[must_use]
    pub fn grouped_output_tokens(&self) -> Vec<Vec<i64>> {
        group(&self.output_tokens, &self.counts())
    }
}

/// Builds the latency range series for every bucket, `other` included.
#[must_use]
pub fn range_series(buckets: &ModelBuckets) -> RangeSeries {
    buckets
        .iter()
        .map(|(name, bucket)| {
            (
                name.to_string(),
                merge_pairs(&bucket.start_offsets, &bucket.end_offsets),
            )
        })
        .collect()
}

/// Builds the token timeline for generation models.
///
/// Within each model, entries are stably sorted by start offset and the same
/// reordering is applied to end offsets and token counts.
#[must_use]
pub fn token_timeline(buckets: &ModelBuckets) -> TokenTimeline {
    let mut pairs = Vec::new();
    let mut inputs = Vec::new();
    let mut outputs = Vec::new();
    let mut modelandcount = Vec::new();

    for (name, bucket) in buckets.models() {
        let perm = sort_permutation(&bucket.start_offsets);
        let starts = apply_permutation(&bucket.start_offsets, &perm);
        let ends = apply_permutation(&bucket.end_offsets, &perm);

        pairs.push(merge_pairs(&starts, &ends));
        inputs.push(apply_permutation(&bucket.input_tokens, &perm));
        outputs.push(apply_permutation(&bucket.output_tokens, &perm));
        modelandcount.push(ModelCount {
            title: name.to_string(),
            cols: bucket.call_count,
        });
    }

    TokenTimeline {
        timeline: flatten(&pairs),
        input_tokens: flatten(&inputs),
        output_tokens: flatten(&outputs),
        modelandcount,
    }
}

/// Counts observations per bucket, `other` included.
#[must_use]
pub fn call_counts(buckets: &ModelBuckets) -> CallCounts {
    buckets
        .iter()
        .map(|(name, bucket)| (name.to_string(), bucket.call_count))
        .collect()
}

/// Aggregates latency, tokens and calls per generation model.
#[must_use]
pub fn summary(buckets: &ModelBuckets) -> SummarySeries {
    buckets
        .models()
        .map(|(name, bucket)| {
            (
                name.to_string(),
                SummaryRow(
                    bucket.total_latency(),
                    bucket.total_input_tokens(),
                    bucket.total_output_tokens(),
                    bucket.call_count,
                ),
            )
        })
        .collect()
}

/// Total latency per generation model.
#[must_use]
pub fn summary_latency(buckets: &ModelBuckets) -> SummaryLatencySeries {
    buckets
        .models()
        .map(|(name, bucket)| (name.to_string(), [bucket.total_latency()]))
        .collect()
}

/// Total prompt and completion tokens per generation model.
#[must_use]
pub fn summary_tokens(buckets: &ModelBuckets) -> SummaryTokenSeries {
    buckets
        .models()
        .map(|(name, bucket)| {
            (
                name.to_string(),
                [bucket.total_input_tokens(), bucket.total_output_tokens()],
            )
        })
        .collect()
}
