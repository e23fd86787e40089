//! # scatter-search
//!
//! Concurrent search aggregation over simulated backends.
//!
//! A query is fanned out to every configured source (web, image, video by
//! default), each answering after a bounded random latency. Results are
//! collected from one shared channel in arrival order.
//!
//! ## Design
//!
//! - [`search`]: unbounded fan-out/fan-in, always complete
//! - [`search_with_deadline`]: the same fan-out cut off at a deadline,
//!   possibly partial
//! - [`search_replicated`]: several replicas of the whole fan-out raced
//!   against each other; the first complete result set wins
//! - [`search_sequential`]: one source after another, as a baseline
//!
//! Work nobody waits for anymore (late producers, losing replicas) is
//! either left to finish or cancelled, per [`AbandonPolicy`].
//!
//! ## Logging
//!
//! Query text is logged only at trace level.

pub mod config;
pub mod error;
pub mod latency;
pub mod orchestrator;
pub mod scope;
pub mod source;
pub mod sources;
pub mod types;

pub use config::SearchConfig;
pub use error::{Result, SearchError};
pub use latency::{LatencyModel, ScriptedLatency, UniformLatency};
pub use scope::{AbandonPolicy, TaskScope};
pub use source::Source;
pub use sources::SimulatedSource;
pub use types::{
    CollectionStatus, RaceOutcome, ReplicaId, ReplicaNotice, ResultSet, SourceResult, SourceSpec,
};

use tokio::sync::mpsc;

/// Query every configured source concurrently and wait for all of them.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> scatter_search::Result<()> {
/// let config = scatter_search::SearchConfig::default();
/// let results = scatter_search::search("golang", &config).await?;
/// for result in &results.entries {
///     println!("{result}");
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<ResultSet> {
    config.validate()?;
    let scope = TaskScope::new(config.abandon);
    orchestrator::fan_out(query, &config.build_sources(), &scope).await
}

/// Query every configured source concurrently, giving up at `config.deadline_ms`.
///
/// A missed deadline is not an error: the returned set is marked
/// [`CollectionStatus::DeadlineExceeded`].
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid.
pub async fn search_with_deadline(query: &str, config: &SearchConfig) -> Result<ResultSet> {
    config.validate()?;
    let scope = TaskScope::new(config.abandon);
    orchestrator::fan_out_with_deadline(query, &config.build_sources(), config.deadline(), &scope)
        .await
}

/// Query every configured source one after another.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid.
pub async fn search_sequential(query: &str, config: &SearchConfig) -> Result<ResultSet> {
    config.validate()?;
    Ok(orchestrator::sequential(query, &config.build_sources()).await)
}

/// Race `config.replicas` replicas of the fan-out; the first to finish wins.
///
/// # Errors
///
/// Returns [`SearchError::Config`] if `config` is invalid, or
/// [`SearchError::AllReplicasFailed`] if no replica reports.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> scatter_search::Result<()> {
/// let config = scatter_search::SearchConfig::default();
/// let outcome = scatter_search::search_replicated("golang", &config).await?;
/// println!("{} won in {:?}", outcome.winner, outcome.elapsed);
/// # Ok(())
/// # }
/// ```
pub async fn search_replicated(query: &str, config: &SearchConfig) -> Result<RaceOutcome> {
    race(query, config, None).await
}

/// Like [`search_replicated`], forwarding a [`ReplicaNotice`] for every
/// replica that finishes.
///
/// # Errors
///
/// Same as [`search_replicated`].
pub async fn search_replicated_with_notices(
    query: &str,
    config: &SearchConfig,
    notices: mpsc::UnboundedSender<ReplicaNotice>,
) -> Result<RaceOutcome> {
    race(query, config, Some(notices)).await
}

async fn race(
    query: &str,
    config: &SearchConfig,
    notices: Option<mpsc::UnboundedSender<ReplicaNotice>>,
) -> Result<RaceOutcome> {
    config.validate()?;
    let scope = TaskScope::new(config.abandon);
    let mut race = orchestrator::Race::new(query, config.replica_ids());
    if let Some(notices) = notices {
        race = race.with_notices(notices);
    }
    race.launch(&config.build_sources(), &scope)?.winner().await
}
