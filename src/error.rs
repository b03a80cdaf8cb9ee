//! Error types for benchmark streams and evaluation.

use thiserror::Error;

/// Errors that can occur while streaming documents or deriving ground truth.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenchError {
    /// A split has no documents to stream.
    #[error("split '{split}' is empty, nothing to stream")]
    EmptySplit { split: &'static str },

    /// A requested sample cannot be drawn (zero size or empty split).
    #[error("cannot sample {requested} queries from {available} available")]
    InsufficientData { requested: usize, available: usize },

    /// A query's label has no group in the index split, so no ground
    /// truth can be formed for it.
    #[error("query {query_id} has label {label} with no matching index group")]
    UnknownLabel { label: u32, query_id: u32 },

    /// Content and label arrays of a split disagree in length.
    #[error("split has {vectors} vectors but {labels} labels")]
    MismatchedSplit { vectors: usize, labels: usize },

    /// The external engine reported a failure.
    #[error("engine error: {0}")]
    Engine(String),
}

/// Result type for benchmark operations.
pub type Result<T> = std::result::Result<T, BenchError>;
