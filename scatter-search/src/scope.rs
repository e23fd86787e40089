//! Spawning under an abandonment policy.
//!
//! Aggregators stop listening once they have what they need: a deadline
//! fires, or a race is decided. Producers and replicas still in flight at
//! that point are abandoned. [`TaskScope`] decides what abandoning means:
//!
//! - [`AbandonPolicy::Detach`]: tasks are fire-and-forget. They run to
//!   completion and their late sends land on a closed channel.
//! - [`AbandonPolicy::Cancel`]: tasks run under a [`CancellationToken`] and
//!   are dropped at their next suspension point once the scope is abandoned.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::error::SearchError;

/// What happens to in-flight work nobody is waiting for anymore.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbandonPolicy {
    /// Leave abandoned tasks running; discard whatever they produce.
    #[default]
    Detach,
    /// Cancel abandoned tasks so their resources are reclaimed promptly.
    Cancel,
}

impl std::fmt::Display for AbandonPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Detach => "detach",
            Self::Cancel => "cancel",
        })
    }
}

impl std::str::FromStr for AbandonPolicy {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "detach" => Ok(Self::Detach),
            "cancel" => Ok(Self::Cancel),
            other => Err(SearchError::Config(format!(
                "unknown abandon policy: {other} (expected detach or cancel)"
            ))),
        }
    }
}

/// A spawning scope bound to one [`AbandonPolicy`].
///
/// Scopes nest: a child scope is abandoned when its parent is, but
/// abandoning a child leaves the parent and its siblings running.
#[derive(Debug, Clone)]
pub struct TaskScope {
    policy: AbandonPolicy,
    token: CancellationToken,
}

impl TaskScope {
    /// Create a root scope.
    pub fn new(policy: AbandonPolicy) -> Self {
        Self {
            policy,
            token: CancellationToken::new(),
        }
    }

    /// The active policy.
    pub fn policy(&self) -> AbandonPolicy {
        self.policy
    }

    /// A nested scope with the same policy.
    pub fn child(&self) -> Self {
        Self {
            policy: self.policy,
            token: self.token.child_token(),
        }
    }

    /// Spawn `task` onto the runtime under this scope's policy.
    pub fn spawn<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self.policy {
            AbandonPolicy::Detach => {
                tokio::spawn(task);
            }
            AbandonPolicy::Cancel => {
                let token = self.token.clone();
                tokio::spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            tracing::trace!("abandoned task cancelled");
                        }
                        _ = task => {}
                    }
                });
            }
        }
    }

    /// Abandon every task spawned in this scope and its children.
    ///
    /// A no-op under [`AbandonPolicy::Detach`].
    pub fn abandon(&self) {
        if self.policy == AbandonPolicy::Cancel {
            self.token.cancel();
        }
    }

    /// A guard that abandons this scope when dropped.
    ///
    /// `None` under [`AbandonPolicy::Detach`]. Holders that can be dropped
    /// mid-flight keep one so their tasks go with them.
    pub fn guard(&self) -> Option<DropGuard> {
        match self.policy {
            AbandonPolicy::Detach => None,
            AbandonPolicy::Cancel => Some(self.token.clone().drop_guard()),
        }
    }

    /// Whether this scope has been abandoned under [`AbandonPolicy::Cancel`].
    pub fn is_abandoned(&self) -> bool {
        self.token.is_cancelled()
    }
}
