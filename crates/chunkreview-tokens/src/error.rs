//! Error types for tokenization and chunking

use thiserror::Error;

/// Errors that can occur while tokenizing or chunking text
#[derive(Debug, Error, PartialEq, Clone)]
pub enum TokenizerError {
    /// The BPE table for an encoding could not be loaded
    #[error("Encoding {encoding} unavailable: {reason}")]
    EncodingUnavailable { encoding: String, reason: String },

    /// Chunk size must be at least one token
    #[error("Invalid chunk size: {0} (must be greater than zero)")]
    InvalidChunkSize(usize),
}

/// Result type for tokenizer operations
pub type TokenizerResult<T> = Result<T, TokenizerError>;
