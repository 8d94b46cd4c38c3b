//! Provider trait

use async_trait::async_trait;

use crate::{
    error::ProviderError,
    models::{ChatRequest, ChatResponse, ModelInfo},
};

/// Core trait that all providers must implement
///
/// Each `chat` call is an independent, single request with no memory of
/// earlier calls.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Get the provider's unique identifier
    fn id(&self) -> &str;

    /// Get the provider's human-readable name
    fn name(&self) -> &str;

    /// Get the list of models with known limits
    fn models(&self) -> Vec<ModelInfo>;

    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Check if the provider is reachable and the credential is accepted
    async fn health_check(&self) -> Result<bool, ProviderError>;
}
