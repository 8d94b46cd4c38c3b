//! Error types for the review pipeline

use std::path::PathBuf;

use chunkreview_tokens::TokenizerError;
use thiserror::Error;

/// Errors that can occur while running the pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No input paths were given
    #[error("No documents to analyze")]
    NoDocuments,

    /// File is missing or could not be read; the document is skipped
    #[error("Cannot read {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },

    /// File content is not valid UTF-8
    #[error("{} is not valid UTF-8 text", .path.display())]
    InvalidEncoding { path: PathBuf },

    /// Tokenizer or chunker failure
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),

    /// Invalid review configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// The run was cancelled before it finished
    #[error("Analysis cancelled")]
    Cancelled,
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_path() {
        let err = PipelineError::Unreadable {
            path: PathBuf::from("src/b.txt"),
            reason: "No such file or directory".to_string(),
        };
        assert_eq!(err.to_string(), "Cannot read src/b.txt: No such file or directory");
    }
}
