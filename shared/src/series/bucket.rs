//! Per-model metric extraction.
//!
//! A [`ModelBucket`] holds parallel arrays with one entry per observation
//! assigned to the model. [`ModelBuckets`] owns one bucket per registry entry
//! and is built fresh for every request.

use chrono::{DateTime, Utc};

use super::classify::{classify, ModelId, ModelRegistry};
use super::time::{latency_seconds, offsets};
use crate::models::Observation;

/// Metrics extracted from the observations of one model.
///
/// All arrays have length `call_count`, and index `i` refers to the same
/// source observation in each of them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelBucket {
    /// Latency of each observation, in seconds.
    pub latencies: Vec<f64>,
    /// Start offsets from the trace reference time, in seconds.
    pub start_offsets: Vec<f64>,
    /// End offsets from the trace reference time, in seconds.
    pub end_offsets: Vec<f64>,
    /// Prompt token counts.
    pub input_tokens: Vec<i64>,
    /// Completion token counts.
    pub output_tokens: Vec<i64>,
    /// Number of observations recorded.
    pub call_count: usize,
}

impl ModelBucket {
    /// Creates an empty bucket.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the metrics of one observation.
    ///
    /// Missing latency and token counts are recorded as zero. Values are not
    /// otherwise checked.
    pub fn record(&mut self, observation: &Observation, reference: DateTime<Utc>) {
        let (start, end) = offsets(observation, reference);

        self.latencies
            .push(latency_seconds(observation.latency_ms.unwrap_or(0.0)));
        self.start_offsets.push(start);
        self.end_offsets.push(end);
        self.input_tokens
            .push(observation.prompt_tokens.unwrap_or(0));
        self.output_tokens
            .push(observation.completion_tokens.unwrap_or(0));
        self.call_count += 1;
    }

    /// Number of observations in the bucket.
    #[must_use]
    pub fn len(&self) -> usize {
        self.call_count
    }

    /// Returns true if no observation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.call_count == 0
    }

    /// Sum of all latencies, in seconds.
    #[must_use]
    pub fn total_latency(&self) -> f64 {
        self.latencies.iter().sum()
    }

    /// Sum of all prompt tokens.
    #[must_use]
    pub fn total_input_tokens(&self) -> i64 {
        self.input_tokens.iter().sum()
    }

    /// Sum of all completion tokens.
    #[must_use]
    pub fn total_output_tokens(&self) -> i64 {
        self.output_tokens.iter().sum()
    }
}

/// Buckets for every model of one trace, indexed by [`ModelId`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelBuckets {
    registry: ModelRegistry,
    buckets: Vec<ModelBucket>,
}

impl ModelBuckets {
    /// Discovers models, classifies observations, and extracts their metrics.
    ///
    /// `reference` is the trace time that offsets are measured from.
    #[must_use]
    pub fn build(observations: &[Observation], reference: DateTime<Utc>) -> Self {
        let registry = ModelRegistry::discover(observations);
        Self::build_with_registry(registry, observations, reference)
    }

    /// Like [`ModelBuckets::build`], with an already known registry.
    #[must_use]
    pub fn build_with_registry(
        registry: ModelRegistry,
        observations: &[Observation],
        reference: DateTime<Utc>,
    ) -> Self {
        let mut buckets = vec![ModelBucket::new(); registry.len()];
        for (id, observation) in classify(&registry, observations) {
            buckets[id.index()].record(observation, reference);
        }

        tracing::trace!(
            models = registry.len(),
            observations = observations.len(),
            "Built model buckets"
        );

        Self { registry, buckets }
    }

    /// Returns the registry the buckets are indexed by.
    #[must_use]
    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Returns the bucket of a model.
    #[must_use]
    pub fn get(&self, id: ModelId) -> &ModelBucket {
        &self.buckets[id.index()]
    }

    /// Returns the bucket of a model by name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ModelBucket> {
        self.registry.id(name).map(|id| self.get(id))
    }

    /// Iterates over every bucket, including `other`, in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ModelBucket)> {
        self.registry
            .iter()
            .map(move |(id, name)| (name, &self.buckets[id.index()]))
    }

    /// Iterates over generation model buckets only.
    pub fn models(&self) -> impl Iterator<Item = (&str, &ModelBucket)> {
        self.registry
            .models()
            .map(move |(id, name)| (name, &self.buckets[id.index()]))
    }
}
