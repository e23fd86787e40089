//! Fan-out bounded by a one-shot deadline.
//!
//! Collection races the shared result channel against a timer armed before
//! any producer launches. Whatever has arrived when the timer fires is
//! returned as a partial [`ResultSet`]; the rest is abandoned.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::fan_out::launch_producers;
use crate::error::SearchError;
use crate::scope::TaskScope;
use crate::source::Source;
use crate::types::ResultSet;

/// Query every source concurrently, giving up after `deadline`.
///
/// Returns early with a complete set as soon as every source reports.
/// Otherwise returns what arrived before the deadline, with
/// [`crate::types::CollectionStatus::DeadlineExceeded`] and a warn-level
/// `deadline exceeded` log line. Results already waiting in the channel
/// when the timer fires are collected first. A producer that has not sent
/// by then is lost, even one whose latency equals the deadline.
///
/// Producers still running at the deadline are abandoned through a child
/// of `scope`, so the caller's own scope is left untouched. Under
/// [`crate::scope::AbandonPolicy::Cancel`] the same happens when the
/// returned future is dropped early.
///
/// # Errors
///
/// Returns [`SearchError::SourcesLost`] if the channel closes before the
/// deadline with results still missing.
pub async fn fan_out_with_deadline<S>(
    query: &str,
    sources: &[Arc<S>],
    deadline: Duration,
    scope: &TaskScope,
) -> Result<ResultSet, SearchError>
where
    S: Source + 'static,
{
    let expected = sources.len();
    let timer = tokio::time::sleep_until(Instant::now() + deadline);
    tokio::pin!(timer);

    let producers = scope.child();
    let _guard = producers.guard();
    let mut rx = launch_producers(query, sources, &producers);
    let mut entries = Vec::with_capacity(expected);

    while entries.len() < expected {
        tokio::select! {
            biased;

            received = rx.recv() => match received {
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
            },
            () = &mut timer => {
                tracing::warn!(
                    received = entries.len(),
                    expected,
                    deadline_ms = u64::try_from(deadline.as_millis()).unwrap_or(u64::MAX),
                    "deadline exceeded"
                );
                producers.abandon();
                return Ok(ResultSet::partial(entries, expected));
            }
        }
    }

    Ok(ResultSet::complete(entries))
}
