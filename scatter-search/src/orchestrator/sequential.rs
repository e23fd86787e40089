//! Sequential baseline: one source after another.

use std::sync::Arc;

use crate::source::Source;
use crate::types::ResultSet;

/// Query each source in configured order, waiting for one before the next.
///
/// Latency is the sum of every source's latency. Entries are in
/// configuration order. Useful only as a comparison point for the
/// concurrent aggregators.
pub async fn sequential<S: Source>(query: &str, sources: &[Arc<S>]) -> ResultSet {
    let mut entries = Vec::with_capacity(sources.len());
    for source in sources {
        entries.push(source.search(query).await);
    }
    ResultSet::complete(entries)
}
