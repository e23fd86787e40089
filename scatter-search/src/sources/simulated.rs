//! Simulated backend — waits a drawn latency, then answers.
//!
//! There is no network behind this source. Latency comes from an injected
//! [`LatencyModel`] so runs can be random (uniform draws) or scripted.

use std::sync::Arc;

use crate::latency::LatencyModel;
use crate::source::Source;
use crate::types::{SourceResult, SourceSpec};

/// A source that simulates a backend category with random latency.
#[derive(Clone)]
pub struct SimulatedSource {
    spec: SourceSpec,
    latency: Arc<dyn LatencyModel>,
}

impl SimulatedSource {
    /// Build a source from its spec and a shared latency model.
    pub fn new(spec: SourceSpec, latency: Arc<dyn LatencyModel>) -> Self {
        Self { spec, latency }
    }

    /// One source per spec, all sharing `latency`.
    pub fn from_specs(specs: &[SourceSpec], latency: Arc<dyn LatencyModel>) -> Vec<Arc<Self>> {
        specs
            .iter()
            .map(|spec| Arc::new(Self::new(spec.clone(), Arc::clone(&latency))))
            .collect()
    }

    /// The spec this source was built from.
    pub fn spec(&self) -> &SourceSpec {
        &self.spec
    }
}

impl std::fmt::Debug for SimulatedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSource")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

impl Source for SimulatedSource {
    fn category(&self) -> &str {
        &self.spec.category
    }

    async fn search(&self, query: &str) -> SourceResult {
        let delay = self.latency.sample(&self.spec.category);
        tracing::trace!(category = %self.spec.category, query, ?delay, "simulated search");
        tokio::time::sleep(delay).await;
        SourceResult {
            category: self.spec.category.clone(),
            query: query.to_string(),
            payload: self.spec.payload.clone(),
        }
    }
}
