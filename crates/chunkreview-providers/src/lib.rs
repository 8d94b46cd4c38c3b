//! ChunkReview Providers - language-model service boundary
//!
//! This crate holds the provider trait, the OpenAI implementation, credential
//! resolution and the stateless completion client used by the review pipeline.

pub mod api_key;
pub mod completion;
pub mod config;
pub mod error;
pub mod models;
pub mod provider;
pub mod providers;
pub mod redaction;

// Re-export commonly used types
pub use api_key::ApiKeyManager;
pub use completion::{validate_credentials, CompletionClient, CompletionRequest};
pub use config::ConfigurationManager;
pub use error::ProviderError;
pub use models::{
    ApiKeyConfig, ChatRequest, ChatResponse, FinishReason, Message, ModelInfo, ProviderSettings,
    TokenUsage,
};
pub use provider::Provider;
pub use providers::OpenAiProvider;
pub use redaction::{redact, RedactionFilter};
