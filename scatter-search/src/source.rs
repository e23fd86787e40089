//! Trait definition for pluggable search sources.
//!
//! Each backend category (web, image, video, ...) implements [`Source`] to
//! provide a uniform interface the aggregators can fan out over.

use crate::types::SourceResult;

/// A pluggable search source.
///
/// A source answers one query with exactly one [`SourceResult`]. It never
/// fails and never retries; its latency must be bounded so that an
/// aggregator without a deadline always terminates.
///
/// All implementations must be `Send + Sync` so they can be shared across
/// concurrently running producer tasks.
pub trait Source: Send + Sync {
    /// Category label carried by every result of this source.
    fn category(&self) -> &str;

    /// Answer `query`, resolving once the source's latency has elapsed.
    fn search(&self, query: &str) -> impl std::future::Future<Output = SourceResult> + Send;
}
