//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised when reading names of core options.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown audio strategy: {0}")]
    UnknownAudioStrategy(String),

    #[error("unknown column layout: {0}")]
    UnknownRowLayout(String),
}
