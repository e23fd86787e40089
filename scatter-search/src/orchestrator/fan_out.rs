//! Unbounded fan-out/fan-in across every configured source.
//!
//! One producer task per source, one shared result channel, exactly N
//! receives. Wall-clock latency is that of the slowest source.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::SearchError;
use crate::scope::TaskScope;
use crate::source::Source;
use crate::types::{ResultSet, SourceResult};

/// Query every source concurrently and wait for all of them.
///
/// # Pipeline
///
/// 1. Spawn one producer per source in a child of `scope`, all sharing one channel
/// 2. Receive exactly `sources.len()` results, appending in arrival order
/// 3. Return the complete [`ResultSet`]
///
/// # Errors
///
/// Returns [`SearchError::SourcesLost`] if the channel closes before every
/// source has reported, which only happens when a producer task panicked
/// or its scope was abandoned.
///
/// Under [`crate::scope::AbandonPolicy::Cancel`], dropping the returned
/// future before it resolves cancels the producers still running.
pub async fn fan_out<S>(
    query: &str,
    sources: &[Arc<S>],
    scope: &TaskScope,
) -> Result<ResultSet, SearchError>
where
    S: Source + 'static,
{
    let expected = sources.len();
    let producers = scope.child();
    let _guard = producers.guard();
    let mut rx = launch_producers(query, sources, &producers);
    let mut entries = Vec::with_capacity(expected);

    while entries.len() < expected {
        match rx.recv().await {
            Some(result) => {
                tracing::debug!(
                    category = %result.category,
                    arrived = entries.len() + 1,
                    expected,
                    "source result arrived"
                );
                entries.push(result);
            }
            None => {
                return Err(SearchError::SourcesLost {
                    expected,
                    received: entries.len(),
                });
            }
        }
    }

    Ok(ResultSet::complete(entries))
}

/// Spawn one producer per source, returning the shared receiving end.
///
/// The channel holds one slot per source so no producer ever blocks on
/// send. Once the receiver is dropped, late sends fail and are discarded.
pub(crate) fn launch_producers<S>(
    query: &str,
    sources: &[Arc<S>],
    scope: &TaskScope,
) -> mpsc::Receiver<SourceResult>
where
    S: Source + 'static,
{
    let (tx, rx) = mpsc::channel(sources.len().max(1));

    for source in sources {
        let source = Arc::clone(source);
        let tx = tx.clone();
        let query = query.to_string();
        scope.spawn(async move {
            let result = source.search(&query).await;
            if tx.send(result).await.is_err() {
                tracing::trace!(category = source.category(), "late result discarded");
            }
        });
    }

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::ScriptedLatency;
    use crate::scope::AbandonPolicy;
    use crate::sources::SimulatedSource;
    use crate::types::SourceSpec;
    use std::time::Duration;
    use tokio::time::Instant;

    fn sources(pairs: &[(&str, u64)]) -> Vec<Arc<SimulatedSource>> {
        let specs: Vec<SourceSpec> = pairs
            .iter()
            .map(|(category, _)| SourceSpec::new(*category, "payload"))
            .collect();
        let latency = Arc::new(ScriptedLatency::from_millis(pairs.iter().copied()));
        SimulatedSource::from_specs(&specs, latency)
    }

    #[tokio::test(start_paused = true)]
    async fn collects_every_source_in_arrival_order() {
        let sources = sources(&[("Web", 30), ("Image", 10), ("Video", 20)]);
        let scope = TaskScope::new(AbandonPolicy::Detach);

        let set = fan_out("golang", &sources, &scope).await.expect("fan out");

        assert!(set.is_complete());
        assert_eq!(set.categories(), ["Image", "Video", "Web"]);
        assert!(set.entries.iter().all(|r| r.query == "golang"));
    }

    #[tokio::test(start_paused = true)]
    async fn latency_is_bounded_by_slowest_source() {
        let sources = sources(&[("Web", 10), ("Image", 90), ("Video", 40)]);
        let scope = TaskScope::new(AbandonPolicy::Detach);

        let start = Instant::now();
        let set = fan_out("golang", &sources, &scope).await.expect("fan out");

        assert_eq!(set.len(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(90));
    }

    #[tokio::test]
    async fn no_sources_yields_empty_complete_set() {
        let sources: Vec<Arc<SimulatedSource>> = Vec::new();
        let scope = TaskScope::new(AbandonPolicy::Detach);

        let set = fan_out("golang", &sources, &scope).await.expect("fan out");

        assert!(set.is_empty());
        assert!(set.is_complete());
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_scope_reports_lost_sources() {
        let sources = sources(&[("Web", 10), ("Image", 50)]);
        let scope = TaskScope::new(AbandonPolicy::Cancel);
        let abandon = scope.clone();

        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            abandon.abandon();
        });
        let err = fan_out("golang", &sources, &scope).await.unwrap_err();

        assert!(matches!(
            err,
            SearchError::SourcesLost {
                expected: 2,
                received: 1
            }
        ));
    }
}
