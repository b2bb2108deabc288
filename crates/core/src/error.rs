//! Error types for docchat.
//!
//! This module defines a unified error enum covering every failure category
//! in the pipeline: configuration, I/O, text ingestion, embedding and
//! generation collaborators, and index construction.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for docchat.
///
/// All fallible functions in the workspace return `Result<T, AppError>`.
/// We never panic; errors are represented and propagated.
///
/// [`AppError::NoContent`], [`AppError::EmptyCorpus`] and
/// [`AppError::DimensionMismatch`] are fatal at startup: they abort the
/// session before the interactive loop begins. Collaborator failures
/// ([`AppError::Llm`], [`AppError::Embedding`]) raised during a turn are
/// reported for that turn and the loop continues.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O and filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Answer-generation provider errors
    #[error("LLM error: {0}")]
    Llm(String),

    /// Embedding provider errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Document ingestion errors (unreadable folder, unsupported file, ...)
    #[error("Ingestion error: {0}")]
    Ingestion(String),

    /// The document folder yielded no extractable text
    #[error("no extractable text in {}", path.display())]
    NoContent {
        /// The folder that was scanned
        path: PathBuf,
    },

    /// Chunking produced zero chunks; no index can be built
    #[error("cannot build an index from an empty corpus")]
    EmptyCorpus,

    /// A vector's length disagrees with the index dimension
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Dimension fixed at index build time
        expected: usize,
        /// Dimension of the offending vector
        actual: usize,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(err: serde_yaml::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}

/// Convenience type alias for Results with AppError.
pub type AppResult<T> = Result<T, AppError>;
