// CLI error types

use chunkreview_pipeline::PipelineError;
use chunkreview_providers::ProviderError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential error: {0}")]
    Credentials(String),

    #[error("Input error: {0}")]
    Input(String),

    #[error("Analysis cancelled")]
    Cancelled,

    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Get a user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(msg) => format!(
                "Configuration error: {}\n\nCheck .chunkreview.yaml, the CHUNKREVIEW_* environment variables and the command-line flags.",
                msg
            ),
            CliError::Credentials(msg) => format!(
                "Credential error: {}\n\nSet a valid key in OPENAI_API_KEY or in a .env file.",
                msg
            ),
            CliError::Input(msg) => format!("Input error: {}", msg),
            CliError::Cancelled => "Analysis cancelled; no report was produced.".to_string(),
            CliError::Output(msg) => format!("Could not write the report: {}", msg),
        }
    }

    /// Get technical details for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }

    /// Process exit status; usage errors are reported by clap with status 2
    pub fn exit_code(&self) -> i32 {
        1
    }
}

impl From<PipelineError> for CliError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Config(msg) => CliError::Config(msg),
            PipelineError::Tokenizer(e) => CliError::Config(e.to_string()),
            PipelineError::Cancelled => CliError::Cancelled,
            e @ (PipelineError::NoDocuments
            | PipelineError::Unreadable { .. }
            | PipelineError::InvalidEncoding { .. }) => CliError::Input(e.to_string()),
        }
    }
}

impl From<ProviderError> for CliError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::AuthError => CliError::Credentials(err.to_string()),
            ProviderError::ConfigError(msg) => CliError::Config(msg),
            other => CliError::Config(other.to_string()),
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
