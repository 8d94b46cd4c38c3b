//! Stateless single-shot completion client
//!
//! One call is one request: a system instruction plus one user payload. The
//! client never retries. A failed call is logged and yields an empty string, so
//! a broken chunk degrades the report instead of aborting the run.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::ProviderError;
use crate::models::{ChatRequest, Message};
use crate::provider::Provider;
use crate::redaction::redact;

/// One completion exchange
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// System instruction
    pub system_prompt: String,
    /// User payload
    pub user_content: String,
    /// Model identifier
    pub model: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Ceiling on generated tokens
    pub max_response_tokens: usize,
}

impl CompletionRequest {
    /// Build the two-message chat request sent to the provider
    pub fn to_chat_request(&self) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message::system(self.system_prompt.clone()),
                Message::user(self.user_content.clone()),
            ],
            temperature: Some(self.temperature),
            max_tokens: Some(self.max_response_tokens),
        }
    }
}

/// Completion client over an injected provider
#[derive(Clone)]
pub struct CompletionClient {
    provider: Arc<dyn Provider>,
}

impl CompletionClient {
    /// Create a client for a provider
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Send a request and return the trimmed response text, or an empty string on failure
    pub async fn complete(&self, request: &CompletionRequest) -> String {
        match self.try_complete(request).await {
            Ok(text) => text,
            Err(e) => {
                error!(
                    provider = self.provider.id(),
                    model = %request.model,
                    error = %redact(&e.to_string()),
                    "Completion failed, continuing with empty result"
                );
                String::new()
            }
        }
    }

    /// Send a request and surface the provider error
    pub async fn try_complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
        let response = self.provider.chat(request.to_chat_request()).await?;
        debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            finish_reason = ?response.finish_reason,
            "Completion received"
        );
        Ok(response.content.trim().to_string())
    }
}

/// Check that the provider accepts the configured credential
///
/// Anything other than a healthy answer is a configuration error.
pub async fn validate_credentials(provider: &dyn Provider) -> Result<(), ProviderError> {
    match provider.health_check().await {
        Ok(true) => {
            info!(provider = provider.id(), "API key validated");
            Ok(())
        }
        Ok(false) => Err(ProviderError::ConfigError(format!(
            "{} did not accept the credential check",
            provider.name()
        ))),
        Err(ProviderError::AuthError) => Err(ProviderError::ConfigError(format!(
            "{} rejected the API key",
            provider.name()
        ))),
        Err(e) => Err(ProviderError::ConfigError(format!(
            "Could not validate the {} API key: {}",
            provider.name(),
            redact(&e.to_string())
        ))),
    }
}
