//! Run-mode dispatch: one query through one aggregation pattern.

use std::fmt;
use std::time::Duration;

use scatter_search::{ReplicaId, ReplicaNotice, ResultSet, SearchConfig};
use serde::{Serialize, Serializer};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::error::Result;

/// Which aggregation pattern to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fan out to every source and wait for all of them.
    Parallel,
    /// Fan out, but stop at the configured deadline.
    Deadline,
    /// Race replicas of the fan-out and keep the first.
    Race,
    /// One source after another.
    Sequential,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Parallel => "parallel",
            Self::Deadline => "deadline",
            Self::Race => "race",
            Self::Sequential => "sequential",
        })
    }
}

/// Everything one run produced, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Pattern that was run.
    pub mode: Mode,
    /// Query that was sent.
    pub query: String,
    /// Collected results (the winner's, for a race).
    pub results: ResultSet,
    /// Winning replica, for a race.
    pub winner: Option<ReplicaId>,
    /// Replicas that had finished by the time the race was decided.
    pub finished: Vec<ReplicaNotice>,
    /// Wall-clock time of the whole run.
    #[serde(rename = "elapsed_ms", serialize_with = "as_millis")]
    pub elapsed: Duration,
}

fn as_millis<S: Serializer>(d: &Duration, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// Run `query` through `mode` and time the whole invocation.
///
/// # Errors
///
/// Returns an error if `config` is invalid or every raced replica fails.
pub async fn run(mode: Mode, query: &str, config: &SearchConfig) -> Result<Report> {
    let started = Instant::now();
    tracing::debug!(%mode, abandon = %config.abandon, "run started");

    let (results, winner, finished) = match mode {
        Mode::Parallel => (scatter_search::search(query, config).await?, None, Vec::new()),
        Mode::Deadline => (
            scatter_search::search_with_deadline(query, config).await?,
            None,
            Vec::new(),
        ),
        Mode::Sequential => (
            scatter_search::search_sequential(query, config).await?,
            None,
            Vec::new(),
        ),
        Mode::Race => {
            let (tx, mut rx) = mpsc::unbounded_channel();
            let outcome =
                scatter_search::search_replicated_with_notices(query, config, tx).await?;
            let mut finished = Vec::new();
            while let Ok(notice) = rx.try_recv() {
                finished.push(notice);
            }
            (outcome.results, Some(outcome.winner), finished)
        }
    };

    let elapsed = started.elapsed();
    tracing::info!(%mode, entries = results.len(), ?elapsed, "run complete");

    Ok(Report {
        mode,
        query: query.to_owned(),
        results,
        winner,
        finished,
        elapsed,
    })
}
