//! Core types for source results, result sets, and replica identification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A named producer specification: one backend category to query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Category label, e.g. `Web`. Must be unique within a configuration.
    pub category: String,
    /// Fixed descriptive payload attached to every result from this source.
    pub payload: String,
}

impl SourceSpec {
    /// Build a spec from a category label and payload.
    pub fn new(category: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            payload: payload.into(),
        }
    }

    /// The three classic categories: Web, Image, Video.
    pub fn defaults() -> Vec<SourceSpec> {
        vec![
            Self::new("Web", "web pages"),
            Self::new("Image", "image thumbnails"),
            Self::new("Video", "video clips"),
        ]
    }
}

/// A single result emitted by one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceResult {
    /// Which source category produced this result.
    pub category: String,
    /// The query this result answers.
    pub query: String,
    /// The source's fixed descriptive payload.
    pub payload: String,
}

impl fmt::Display for SourceResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} result for {:?}", self.category, self.query)
    }
}

/// How a collection pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum CollectionStatus {
    /// Every launched source reported.
    Complete,
    /// The deadline fired first; `missing` sources never reported.
    DeadlineExceeded {
        /// Number of sources whose results were not collected.
        missing: usize,
    },
}

/// Results collected by one aggregation pass, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSet {
    /// Results in the order they arrived on the shared channel.
    pub entries: Vec<SourceResult>,
    /// Number of sources that were launched.
    pub expected: usize,
    /// Whether collection completed or was cut short.
    pub status: CollectionStatus,
}

impl ResultSet {
    /// A result set in which every launched source reported.
    pub fn complete(entries: Vec<SourceResult>) -> Self {
        let expected = entries.len();
        Self {
            entries,
            expected,
            status: CollectionStatus::Complete,
        }
    }

    /// A result set cut short by a deadline.
    ///
    /// Degenerates to [`ResultSet::complete`] when nothing is missing.
    pub fn partial(entries: Vec<SourceResult>, expected: usize) -> Self {
        let missing = expected.saturating_sub(entries.len());
        if missing == 0 {
            return Self::complete(entries);
        }
        Self {
            entries,
            expected,
            status: CollectionStatus::DeadlineExceeded { missing },
        }
    }

    /// Number of collected results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no result was collected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether every launched source reported.
    pub fn is_complete(&self) -> bool {
        self.status == CollectionStatus::Complete
    }

    /// Whether collection was interrupted by a deadline.
    pub fn deadline_exceeded(&self) -> bool {
        matches!(self.status, CollectionStatus::DeadlineExceeded { .. })
    }

    /// Categories in arrival order.
    pub fn categories(&self) -> Vec<&str> {
        self.entries.iter().map(|r| r.category.as_str()).collect()
    }
}

/// Identifier of one replica of the aggregation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReplicaId(pub u32);

impl ReplicaId {
    /// Ids `1..=count`.
    pub fn range(count: u32) -> Vec<ReplicaId> {
        (1..=count).map(ReplicaId).collect()
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replica-{}", self.0)
    }
}

/// Diagnostic notice emitted when a replica finishes its aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplicaNotice {
    /// Which replica finished.
    pub replica: ReplicaId,
    /// How many results it collected.
    pub entries: usize,
    /// Time from replica launch to completion.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

/// The winning replica of a race and its results.
#[derive(Debug, Clone, Serialize)]
pub struct RaceOutcome {
    /// Replica whose result set arrived first.
    pub winner: ReplicaId,
    /// The winner's result set.
    pub results: ResultSet,
    /// Time from race launch to decision.
    #[serde(with = "duration_millis")]
    pub elapsed: Duration,
}

mod duration_millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
    }
}
