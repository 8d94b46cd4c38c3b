//! OpenAI provider implementation
//!
//! Talks to the Chat Completions API. Any model id is forwarded as-is; the
//! model list only carries context-window sizes for known models.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::RETRY_AFTER, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::error::ProviderError;
use crate::models::{ChatRequest, ChatResponse, FinishReason, ModelInfo, ProviderSettings, TokenUsage};
use crate::provider::Provider;
use crate::redaction::redact;

/// Default OpenAI API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Retry hint used when a 429 carries no `Retry-After` header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// OpenAI provider implementation
pub struct OpenAiProvider {
    api_key: String,
    client: Arc<Client>,
    base_url: String,
}

impl OpenAiProvider {
    /// Create a new OpenAI provider instance
    pub fn new(api_key: String) -> Result<Self, ProviderError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    /// Create a new OpenAI provider with a custom base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, ProviderError> {
        Self::from_settings(&ProviderSettings {
            api_key: Some(api_key),
            base_url: Some(base_url),
            ..Default::default()
        })
    }

    /// Create a provider from resolved settings
    pub fn from_settings(settings: &ProviderSettings) -> Result<Self, ProviderError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::ConfigError("OpenAI API key is required".to_string()))?;

        let mut builder = Client::builder().timeout(settings.timeout.unwrap_or(DEFAULT_TIMEOUT));
        if let Some(proxy_url) = &settings.proxy {
            let proxy = reqwest::Proxy::all(proxy_url.as_str()).map_err(|e| {
                ProviderError::ConfigError(format!("Invalid proxy URL '{}': {}", redact(proxy_url), e))
            })?;
            builder = builder.proxy(proxy);
        }
        let client = builder
            .build()
            .map_err(|e| ProviderError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        let base_url = settings
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            api_key,
            client: Arc::new(client),
            base_url,
        })
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn get_auth_header(&self) -> String {
        format!("Bearer {}", self.api_key)
    }

    /// Map a non-success status to an error
    fn status_error(status: StatusCode, retry_after: Option<u64>, body: &str) -> ProviderError {
        match status.as_u16() {
            401 | 403 => ProviderError::AuthError,
            429 => ProviderError::RateLimited(retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS)),
            _ => {
                let detail = serde_json::from_str::<OpenAiErrorResponse>(body)
                    .map(|e| e.error.message)
                    .unwrap_or_else(|_| status.to_string());
                ProviderError::ProviderError(format!("OpenAI API error ({}): {}", status, redact(&detail)))
            }
        }
    }

    /// Convert OpenAI API response to our ChatResponse
    fn convert_response(response: OpenAiChatResponse, model: String) -> Result<ChatResponse, ProviderError> {
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::ParseError("No choices in response".to_string()))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .ok_or_else(|| ProviderError::ParseError("No content in response".to_string()))?;

        let finish_reason = match choice.finish_reason.as_deref() {
            Some("length") => FinishReason::Length,
            Some("content_filter") => FinishReason::ContentFilter,
            Some("error") => FinishReason::Error,
            _ => FinishReason::Stop,
        };

        let usage = response
            .usage
            .map(|u| TokenUsage {
                prompt_tokens: u.prompt_tokens,
                completion_tokens: u.completion_tokens,
                total_tokens: u.total_tokens,
            })
            .unwrap_or_default();

        Ok(ChatResponse {
            content,
            model: response.model.unwrap_or(model),
            usage,
            finish_reason,
        })
    }
}

#[async_trait]
impl Provider for OpenAiProvider {
    fn id(&self) -> &str {
        "openai"
    }

    fn name(&self) -> &str {
        "OpenAI"
    }

    fn models(&self) -> Vec<ModelInfo> {
        [
            ("gpt-4o", "GPT-4o", 128_000),
            ("gpt-4o-mini", "GPT-4o mini", 128_000),
            ("gpt-4.1", "GPT-4.1", 1_047_576),
            ("gpt-4-turbo", "GPT-4 Turbo", 128_000),
            ("gpt-4", "GPT-4", 8_192),
            ("gpt-3.5-turbo", "GPT-3.5 Turbo", 16_385),
        ]
        .into_iter()
        .map(|(id, name, context_window)| ModelInfo {
            id: id.to_string(),
            name: name.to_string(),
            provider: "openai".to_string(),
            context_window,
        })
        .collect()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let openai_request = OpenAiChatRequest {
            model: request.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| OpenAiRequestMessage {
                    role: m.role.clone(),
                    content: m.content.clone(),
                })
                .collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        debug!(model = %request.model, messages = request.messages.len(), "Sending chat request to OpenAI");

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", self.get_auth_header())
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenAI API request failed: {}", redact(&e.to_string()));
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenAI API error ({}): {}", status, redact(&error_text));
            return Err(Self::status_error(status, retry_after, &error_text));
        }

        let body = response.text().await?;
        let openai_response: OpenAiChatResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::ParseError(format!("Malformed response: {}", e)))?;
        Self::convert_response(openai_response, request.model)
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        debug!("Performing health check for OpenAI provider");

        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .header("Authorization", self.get_auth_header())
            .send()
            .await
            .map_err(|e| {
                warn!("OpenAI health check failed: {}", redact(&e.to_string()));
                ProviderError::from(e)
            })?;

        match response.status().as_u16() {
            200 => {
                debug!("OpenAI health check passed");
                Ok(true)
            }
            401 | 403 => {
                error!("OpenAI health check failed: authentication error");
                Err(ProviderError::AuthError)
            }
            _ => {
                warn!("OpenAI health check failed with status: {}", response.status());
                Ok(false)
            }
        }
    }
}

/// OpenAI API request format
#[derive(Debug, Serialize)]
struct OpenAiChatRequest {
    model: String,
    messages: Vec<OpenAiRequestMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
}

#[derive(Debug, Serialize)]
struct OpenAiRequestMessage {
    role: String,
    content: String,
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: Option<OpenAiResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
    total_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}
