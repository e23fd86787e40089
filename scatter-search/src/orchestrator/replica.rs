//! One replica of the aggregation pipeline, running on its own task.
//!
//! A replica performs a full unbounded fan-out and reports the result on a
//! private one-shot channel. Launching is non-blocking: the caller gets a
//! [`ReplicaHandle`] immediately and awaits it later (or never).

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use super::fan_out::fan_out;
use crate::scope::TaskScope;
use crate::source::Source;
use crate::types::{ReplicaId, ReplicaNotice, ResultSet};

/// Completion handle for a launched replica.
///
/// Carries exactly one [`ResultSet`]. Dropping the handle does not stop the
/// replica; abandoning its scope does (under the cancel policy).
#[derive(Debug)]
pub struct ReplicaHandle {
    id: ReplicaId,
    completion: oneshot::Receiver<ResultSet>,
    scope: TaskScope,
}

impl ReplicaHandle {
    /// Which replica this handle belongs to.
    pub fn id(&self) -> ReplicaId {
        self.id
    }

    /// Abandon this replica and its producers.
    pub fn abandon(&self) {
        self.scope.abandon();
    }

    /// Wait for the replica's result set.
    ///
    /// Resolves to `None` if the replica ended without reporting, either
    /// because its aggregation failed or because it was abandoned.
    pub async fn finish(self) -> (ReplicaId, Option<ResultSet>) {
        (self.id, self.completion.await.ok())
    }
}

/// Launch one replica in a child of `scope` and return immediately.
///
/// The replica logs `replica finished` when its aggregation completes and,
/// if `notices` is given, sends a [`ReplicaNotice`] there too. A failed
/// aggregation is logged and the completion channel is closed empty.
pub fn launch_replica<S>(
    query: &str,
    id: ReplicaId,
    sources: &[Arc<S>],
    scope: &TaskScope,
    notices: Option<&mpsc::UnboundedSender<ReplicaNotice>>,
) -> ReplicaHandle
where
    S: Source + 'static,
{
    let (tx, rx) = oneshot::channel();
    let replica_scope = scope.child();

    let producers = replica_scope.clone();
    let query = query.to_string();
    let sources = sources.to_vec();
    let notices = notices.cloned();
    replica_scope.spawn(async move {
        let started = Instant::now();
        match fan_out(&query, &sources, &producers).await {
            Ok(results) => {
                let elapsed = started.elapsed();
                tracing::info!(replica = %id, entries = results.len(), ?elapsed, "replica finished");
                if let Some(notices) = notices {
                    let notice = ReplicaNotice {
                        replica: id,
                        entries: results.len(),
                        elapsed,
                    };
                    if notices.send(notice).is_err() {
                        tracing::trace!(replica = %id, "replica notice discarded");
                    }
                }
                if tx.send(results).is_err() {
                    tracing::trace!(replica = %id, "replica result discarded");
                }
            }
            Err(err) => {
                tracing::warn!(replica = %id, error = %err, "replica aggregation failed");
            }
        }
    });

    ReplicaHandle {
        id,
        completion: rx,
        scope: replica_scope,
    }
}
