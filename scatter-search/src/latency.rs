//! Injectable latency models for simulated sources.
//!
//! Every simulated source asks its [`LatencyModel`] how long to wait before
//! reporting. Production runs draw from [`UniformLatency`]; tests pin exact
//! per-category delays with [`ScriptedLatency`] so arrival order and deadline
//! behaviour are deterministic under paused tokio time.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// Source of simulated per-call latency.
pub trait LatencyModel: Send + Sync {
    /// Latency for one call to the source labelled `category`.
    fn sample(&self, category: &str) -> Duration;
}

/// Uniform latency over `[0, max)` in whole milliseconds.
#[derive(Debug)]
pub struct UniformLatency {
    max_ms: u64,
    rng: Mutex<StdRng>,
}

impl UniformLatency {
    /// Unseeded model; every process draws a different sequence.
    pub fn new(max: Duration) -> Self {
        Self::with_rng(max, StdRng::from_entropy())
    }

    /// Seeded model; the same seed reproduces the same draws.
    pub fn seeded(max: Duration, seed: u64) -> Self {
        Self::with_rng(max, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max: Duration, rng: StdRng) -> Self {
        Self {
            max_ms: u64::try_from(max.as_millis()).unwrap_or(u64::MAX),
            rng: Mutex::new(rng),
        }
    }
}

impl LatencyModel for UniformLatency {
    fn sample(&self, _category: &str) -> Duration {
        if self.max_ms == 0 {
            return Duration::ZERO;
        }
        let ms = match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..self.max_ms),
            // A poisoned lock still holds a usable generator.
            Err(poisoned) => poisoned.into_inner().gen_range(0..self.max_ms),
        };
        Duration::from_millis(ms)
    }
}

/// Fixed latency per category, with a fallback for unlisted categories.
#[derive(Debug, Clone, Default)]
pub struct ScriptedLatency {
    delays: HashMap<String, Duration>,
    fallback: Duration,
}

impl ScriptedLatency {
    /// Every category waits `fallback` unless overridden.
    pub fn new(fallback: Duration) -> Self {
        Self {
            delays: HashMap::new(),
            fallback,
        }
    }

    /// Pin the latency of one category.
    pub fn with(mut self, category: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(category.into(), delay);
        self
    }

    /// Build from `(category, milliseconds)` pairs.
    pub fn from_millis<'a>(pairs: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        pairs
            .into_iter()
            .fold(Self::default(), |model, (category, ms)| {
                model.with(category, Duration::from_millis(ms))
            })
    }
}

impl LatencyModel for ScriptedLatency {
    fn sample(&self, category: &str) -> Duration {
        self.delays.get(category).copied().unwrap_or(self.fallback)
    }
}
