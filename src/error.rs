//! Error types for the scatter client.

use scatter_search::SearchError;

/// Top-level error type for the scatter client.
#[derive(Debug, thiserror::Error)]
pub enum ScatterError {
    /// Aggregation or racing error.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration file error.
    #[error("config error: {0}")]
    Config(String),

    /// Report rendering error.
    #[error("report error: {0}")]
    Report(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, ScatterError>;
