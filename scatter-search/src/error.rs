//! Error types for the scatter-search crate.
//!
//! A missed deadline is not an error: it is reported through
//! [`crate::types::CollectionStatus::DeadlineExceeded`]. The variants here
//! cover invalid configuration and tasks that vanished without reporting.

/// Errors that can occur while aggregating or racing searches.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The shared result channel closed before every source reported.
    #[error("sources lost: received {received} of {expected} results")]
    SourcesLost {
        /// Number of sources that were launched.
        expected: usize,
        /// Number of results that actually arrived.
        received: usize,
    },

    /// Every replica closed its completion channel without a result.
    #[error("all replicas failed: {0}")]
    AllReplicasFailed(String),
}

/// Convenience type alias for scatter-search results.
pub type Result<T> = std::result::Result<T, SearchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_config() {
        let err = SearchError::Config("replicas must be greater than 0".into());
        assert_eq!(
            err.to_string(),
            "config error: replicas must be greater than 0"
        );
    }

    #[test]
    fn display_sources_lost() {
        let err = SearchError::SourcesLost {
            expected: 3,
            received: 1,
        };
        assert_eq!(err.to_string(), "sources lost: received 1 of 3 results");
    }

    #[test]
    fn display_all_replicas_failed() {
        let err = SearchError::AllReplicasFailed("replica-1, replica-2".into());
        assert_eq!(
            err.to_string(),
            "all replicas failed: replica-1, replica-2"
        );
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SearchError>();
    }
}
