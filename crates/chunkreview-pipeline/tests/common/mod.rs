//! Shared fixtures for pipeline integration tests

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chunkreview_pipeline::{PipelineContext, ReviewConfig};
use chunkreview_providers::{
    ChatRequest, ChatResponse, CompletionClient, FinishReason, ModelInfo, Provider, ProviderError,
    TokenUsage,
};
use chunkreview_tokens::TokenizerAdapter;
use tokio_util::sync::CancellationToken;

/// Provider that records every request and answers with a label of the payload
pub struct ScriptedProvider {
    requests: Mutex<Vec<ChatRequest>>,
    fail_on: Vec<usize>,
    delay: Option<fn(&ChatRequest) -> Duration>,
    hang: bool,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            fail_on: Vec::new(),
            delay: None,
            hang: false,
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    /// Fail the given 1-based call numbers
    pub fn failing_on(mut self, calls: &[usize]) -> Self {
        self.fail_on = calls.to_vec();
        self
    }

    pub fn with_delay(mut self, delay: fn(&ChatRequest) -> Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Never answer
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

/// Reply text for a request: `reply to <first line of the user payload>`
pub fn reply_for(request: &ChatRequest) -> String {
    format!("reply to {}", first_line(user_content(request)))
}

pub fn system_prompt(request: &ChatRequest) -> &str {
    &request.messages[0].content
}

pub fn user_content(request: &ChatRequest) -> &str {
    &request.messages[1].content
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or_default().chars().take(40).collect()
}

/// Chunk number from a `Part N of ...` payload
pub fn part_number(request: &ChatRequest) -> Option<usize> {
    user_content(request)
        .strip_prefix("Part ")?
        .split_whitespace()
        .next()?
        .parse()
        .ok()
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn id(&self) -> &str {
        "scripted"
    }

    fn name(&self) -> &str {
        "Scripted"
    }

    fn models(&self) -> Vec<ModelInfo> {
        Vec::new()
    }

    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len()
        };

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay(&request)).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_on.contains(&call) {
            return Err(ProviderError::RateLimited(1));
        }

        Ok(ChatResponse {
            content: reply_for(&request),
            model: request.model,
            usage: TokenUsage::default(),
            finish_reason: FinishReason::Stop,
        })
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        Ok(true)
    }
}

/// Configuration using a cl100k model so token counts are predictable
pub fn test_config() -> ReviewConfig {
    ReviewConfig {
        model: "gpt-4".to_string(),
        ..ReviewConfig::default()
    }
}

pub fn context(provider: Arc<ScriptedProvider>, config: ReviewConfig) -> Arc<PipelineContext> {
    context_with_cancel(provider, config, CancellationToken::new())
}

pub fn context_with_cancel(
    provider: Arc<ScriptedProvider>,
    config: ReviewConfig,
    cancel: CancellationToken,
) -> Arc<PipelineContext> {
    Arc::new(
        PipelineContext::new(
            Arc::new(config),
            Arc::new(TokenizerAdapter::new()),
            CompletionClient::new(provider),
            cancel,
        )
        .unwrap(),
    )
}

/// Text of exactly `n` cl100k tokens
pub fn words(n: usize) -> String {
    let mut text = String::from("hello");
    for _ in 1..n {
        text.push_str(" hello");
    }
    text
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}
