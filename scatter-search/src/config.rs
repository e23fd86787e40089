//! Search configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which sources are fanned out to, simulated
//! latency, the aggregation deadline, replica count, and what happens to
//! abandoned work.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::latency::{LatencyModel, UniformLatency};
use crate::scope::AbandonPolicy;
use crate::sources::SimulatedSource;
use crate::types::{ReplicaId, SourceSpec};

/// Configuration for an aggregation run.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Upper bound (exclusive) of simulated per-call latency in milliseconds.
    pub max_latency_ms: u64,
    /// Deadline for deadline-bounded aggregation in milliseconds.
    pub deadline_ms: u64,
    /// Number of replicas raced against each other.
    pub replicas: u32,
    /// What happens to producers and replicas nobody waits for anymore.
    pub abandon: AbandonPolicy,
    /// Seed for simulated latency. `None` draws a fresh sequence per run.
    pub seed: Option<u64>,
    /// Sources to fan out to. Queried concurrently; categories must be unique.
    pub sources: Vec<SourceSpec>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_latency_ms: 100,
            deadline_ms: 50,
            replicas: 3,
            abandon: AbandonPolicy::Detach,
            seed: None,
            sources: SourceSpec::defaults(),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `sources` must not be empty
    /// - source categories must be non-blank and unique
    /// - `max_latency_ms` must be greater than 0
    /// - `deadline_ms` must be greater than 0
    /// - `replicas` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.sources.is_empty() {
            return Err(SearchError::Config(
                "at least one source must be configured".into(),
            ));
        }
        let mut seen = HashSet::new();
        for spec in &self.sources {
            if spec.category.trim().is_empty() {
                return Err(SearchError::Config(
                    "source category must not be blank".into(),
                ));
            }
            if !seen.insert(spec.category.as_str()) {
                return Err(SearchError::Config(format!(
                    "duplicate source category: {}",
                    spec.category
                )));
            }
        }
        if self.max_latency_ms == 0 {
            return Err(SearchError::Config(
                "max_latency_ms must be greater than 0".into(),
            ));
        }
        if self.deadline_ms == 0 {
            return Err(SearchError::Config(
                "deadline_ms must be greater than 0".into(),
            ));
        }
        if self.replicas == 0 {
            return Err(SearchError::Config(
                "replicas must be greater than 0".into(),
            ));
        }
        Ok(())
    }

    /// The aggregation deadline.
    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// The exclusive upper bound of simulated latency.
    pub fn max_latency(&self) -> Duration {
        Duration::from_millis(self.max_latency_ms)
    }

    /// Replica ids `1..=replicas`.
    pub fn replica_ids(&self) -> Vec<ReplicaId> {
        ReplicaId::range(self.replicas)
    }

    /// Uniform latency model, seeded when `seed` is set.
    pub fn latency_model(&self) -> Arc<dyn LatencyModel> {
        match self.seed {
            Some(seed) => Arc::new(UniformLatency::seeded(self.max_latency(), seed)),
            None => Arc::new(UniformLatency::new(self.max_latency())),
        }
    }

    /// Simulated sources for every configured spec, sharing one latency model.
    pub fn build_sources(&self) -> Vec<Arc<SimulatedSource>> {
        SimulatedSource::from_specs(&self.sources, self.latency_model())
    }
}
