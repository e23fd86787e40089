//! First-result-wins racing across replicas of the whole pipeline.
//!
//! # State Machine
//!
//! ```text
//! ┌──────┐  launch   ┌─────────────┐  first result  ┌─────────────┐
//! │ Race ├──────────►│ RunningRace ├───────────────►│ RaceOutcome │
//! └──────┘           └─────────────┘                └─────────────┘
//!   Idle                 Racing                     Decided / Done
//! ```
//!
//! Each transition consumes the previous state, so a race runs once and
//! cannot be restarted. Losing replicas are abandoned, never drained: under
//! [`AbandonPolicy::Detach`](crate::scope::AbandonPolicy::Detach) they run to
//! completion and their results land in a dropped channel.
//!
//! Under [`AbandonPolicy::Cancel`](crate::scope::AbandonPolicy::Cancel) a
//! [`RunningRace`] owns its replicas: dropping it, or the future returned by
//! [`RunningRace::winner`], before a winner is found cancels all of them.

use std::sync::Arc;

use futures::future::{select_all, FutureExt};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tokio_util::sync::DropGuard;

use super::replica::{launch_replica, ReplicaHandle};
use crate::error::SearchError;
use crate::scope::TaskScope;
use crate::source::Source;
use crate::types::{RaceOutcome, ReplicaId, ReplicaNotice};

/// A race that has not started yet.
#[derive(Debug)]
pub struct Race {
    query: String,
    replicas: Vec<ReplicaId>,
    notices: Option<mpsc::UnboundedSender<ReplicaNotice>>,
}

impl Race {
    /// Prepare a race of `replicas` answering `query`.
    pub fn new(query: impl Into<String>, replicas: Vec<ReplicaId>) -> Self {
        Self {
            query: query.into(),
            replicas,
            notices: None,
        }
    }

    /// Forward a [`ReplicaNotice`] for every replica that finishes,
    /// including losers that finish after the race is decided.
    pub fn with_notices(mut self, notices: mpsc::UnboundedSender<ReplicaNotice>) -> Self {
        self.notices = Some(notices);
        self
    }

    /// Launch one replica per id, each fanning out over `sources`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] if there are no replicas to race.
    pub fn launch<S>(self, sources: &[Arc<S>], scope: &TaskScope) -> Result<RunningRace, SearchError>
    where
        S: Source + 'static,
    {
        if self.replicas.is_empty() {
            return Err(SearchError::Config(
                "at least one replica must be raced".into(),
            ));
        }

        let race_scope = scope.child();
        let started = Instant::now();
        let handles: Vec<ReplicaHandle> = self
            .replicas
            .iter()
            .map(|id| launch_replica(&self.query, *id, sources, &race_scope, self.notices.as_ref()))
            .collect();
        tracing::debug!(replicas = handles.len(), "race started");

        Ok(RunningRace {
            handles,
            guard: race_scope.guard(),
            scope: race_scope,
            started,
        })
    }
}

/// A race whose replicas are running.
#[derive(Debug)]
pub struct RunningRace {
    handles: Vec<ReplicaHandle>,
    scope: TaskScope,
    guard: Option<DropGuard>,
    started: Instant,
}

impl RunningRace {
    /// Ids of the replicas taking part.
    pub fn replicas(&self) -> Vec<ReplicaId> {
        self.handles.iter().map(ReplicaHandle::id).collect()
    }

    /// Wait for the first replica to report and return its results.
    ///
    /// A replica that closes its channel without a result is skipped and
    /// the wait continues over the rest. Once a winner is found every other
    /// replica is abandoned.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllReplicasFailed`] if no replica reports.
    pub async fn winner(self) -> Result<RaceOutcome, SearchError> {
        let Self {
            handles,
            scope,
            guard: _guard,
            started,
        } = self;

        let mut pending: Vec<_> = handles.into_iter().map(|h| h.finish().boxed()).collect();
        let mut failed: Vec<String> = Vec::new();

        while !pending.is_empty() {
            let ((id, results), _, remaining) = select_all(pending).await;
            pending = remaining;

            match results {
                Some(results) => {
                    let elapsed = started.elapsed();
                    tracing::info!(
                        winner = %id,
                        entries = results.len(),
                        ?elapsed,
                        abandoned = pending.len(),
                        "race decided"
                    );
                    scope.abandon();
                    return Ok(RaceOutcome {
                        winner: id,
                        results,
                        elapsed,
                    });
                }
                None => {
                    tracing::warn!(replica = %id, "replica closed without a result");
                    failed.push(id.to_string());
                }
            }
        }

        Err(SearchError::AllReplicasFailed(failed.join(", ")))
    }
}

/// Race `replicas` over `sources` and return the first complete result set.
///
/// # Errors
///
/// See [`Race::launch`] and [`RunningRace::winner`].
pub async fn race_replicas<S>(
    query: &str,
    replicas: Vec<ReplicaId>,
    sources: &[Arc<S>],
    scope: &TaskScope,
) -> Result<RaceOutcome, SearchError>
where
    S: Source + 'static,
{
    Race::new(query, replicas).launch(sources, scope)?.winner().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latency::ScriptedLatency;
    use crate::scope::AbandonPolicy;
    use crate::sources::SimulatedSource;
    use crate::types::SourceSpec;
    use std::time::Duration;

    fn default_sources() -> Vec<Arc<SimulatedSource>> {
        let latency = Arc::new(ScriptedLatency::from_millis([
            ("Web", 10),
            ("Image", 20),
            ("Video", 30),
        ]));
        SimulatedSource::from_specs(&SourceSpec::defaults(), latency)
    }

    #[tokio::test(start_paused = true)]
    async fn winner_has_every_source() {
        let scope = TaskScope::new(AbandonPolicy::Detach);

        let outcome = race_replicas("golang", ReplicaId::range(3), &default_sources(), &scope)
            .await
            .expect("race");

        assert!(ReplicaId::range(3).contains(&outcome.winner));
        assert_eq!(outcome.results.len(), 3);
        assert!(outcome.results.is_complete());
        assert_eq!(outcome.elapsed, Duration::from_millis(30));
    }

    #[tokio::test(start_paused = true)]
    async fn single_replica_wins() {
        let scope = TaskScope::new(AbandonPolicy::Cancel);

        let outcome = race_replicas("golang", vec![ReplicaId(7)], &default_sources(), &scope)
            .await
            .expect("race");

        assert_eq!(outcome.winner, ReplicaId(7));
    }

    #[tokio::test]
    async fn empty_race_rejected() {
        let scope = TaskScope::new(AbandonPolicy::Detach);

        let err = Race::new("golang", vec![])
            .launch(&default_sources(), &scope)
            .unwrap_err();

        assert!(err.to_string().contains("replica"));
    }

    #[tokio::test(start_paused = true)]
    async fn running_race_lists_replicas() {
        let scope = TaskScope::new(AbandonPolicy::Cancel);

        let running = Race::new("golang", ReplicaId::range(2))
            .launch(&default_sources(), &scope)
            .expect("launch");

        assert_eq!(running.replicas(), vec![ReplicaId(1), ReplicaId(2)]);
        scope.abandon();
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_race_reports_all_failed() {
        let scope = TaskScope::new(AbandonPolicy::Cancel);
        let running = Race::new("golang", ReplicaId::range(2))
            .launch(&default_sources(), &scope)
            .expect("launch");

        scope.abandon();
        let err = running.winner().await.unwrap_err();

        assert!(matches!(err, SearchError::AllReplicasFailed(_)));
        assert!(err.to_string().contains("replica-1"));
        assert!(err.to_string().contains("replica-2"));
    }
}
