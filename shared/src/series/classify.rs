//! Model discovery and observation classification.
//!
//! Discovery scans a trace's generations for the models actually used and
//! produces an ordered registry. Classification then assigns each observation
//! to exactly one registry entry.

use indexmap::IndexSet;

use crate::models::{Observation, ObservationType};

/// Bucket key that collects non-model spans.
pub const OTHER_BUCKET: &str = "other";

/// Index of a model in a [`ModelRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModelId(usize);

impl ModelId {
    /// Returns the position of this model in registry order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Ordered set of bucket names for one trace.
///
/// Models appear in the order their first generation was seen, followed by
/// the synthetic [`OTHER_BUCKET`] entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRegistry {
    names: IndexSet<String>,
    other: ModelId,
}

impl ModelRegistry {
    /// Discovers the models used by the generations in `observations`.
    #[must_use]
    pub fn discover(observations: &[Observation]) -> Self {
        let names: IndexSet<String> = observations
            .iter()
            .filter(|obs| obs.kind == ObservationType::Generation)
            .filter_map(|obs| obs.model.clone())
            .collect();
        Self::with_other(names)
    }

    /// Builds a registry from explicit model names, appending [`OTHER_BUCKET`].
    #[must_use]
    pub fn from_models<I, S>(models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_other(models.into_iter().map(Into::into).collect())
    }

    fn with_other(mut names: IndexSet<String>) -> Self {
        let (other, _) = names.insert_full(OTHER_BUCKET.to_string());
        Self {
            names,
            other: ModelId(other),
        }
    }

    /// Returns the id of a bucket name.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<ModelId> {
        self.names.get_index_of(name).map(ModelId)
    }

    /// Returns the name of a bucket.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different registry with more entries.
    #[must_use]
    pub fn name(&self, id: ModelId) -> &str {
        &self.names[id.0]
    }

    /// Returns the id of the [`OTHER_BUCKET`] entry.
    #[must_use]
    pub fn other(&self) -> ModelId {
        self.other
    }

    /// Returns true if `id` is the [`OTHER_BUCKET`] entry.
    #[must_use]
    pub fn is_other(&self, id: ModelId) -> bool {
        id == self.other
    }

    /// Number of buckets, including [`OTHER_BUCKET`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false: a registry holds at least the [`OTHER_BUCKET`] entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Iterates over all buckets in registry order.
    pub fn iter(&self) -> impl Iterator<Item = (ModelId, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (ModelId(i), name.as_str()))
    }

    /// Iterates over generation models only, skipping [`OTHER_BUCKET`].
    pub fn models(&self) -> impl Iterator<Item = (ModelId, &str)> {
        let other = self.other;
        self.iter().filter(move |(id, _)| *id != other)
    }
}

/// Assigns observations to buckets, preserving input order.
///
/// Generations go to the bucket of their model and are skipped when the
/// model is missing or unknown to the registry. Spans go to
/// [`OTHER_BUCKET`]. Every other observation type is ignored.
pub fn classify<'a>(
    registry: &'a ModelRegistry,
    observations: &'a [Observation],
) -> impl Iterator<Item = (ModelId, &'a Observation)> + 'a {
    observations.iter().filter_map(move |obs| {
        let id = match obs.kind {
            ObservationType::Generation => registry.id(obs.model.as_deref()?)?,
            ObservationType::Span => registry.other(),
            ObservationType::Event | ObservationType::Other => return None,
        };
        Some((id, obs))
    })
}
