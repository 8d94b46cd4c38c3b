//! Shared state for one pipeline run

use std::sync::Arc;

use chunkreview_providers::{CompletionClient, CompletionRequest};
use chunkreview_tokens::{Chunk, Chunker, TokenizerAdapter};
use futures::{stream, StreamExt, TryStreamExt};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ReviewConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::ChunkResult;
use crate::prompts::Prompts;

/// Configuration, chunker, client and limits shared by every stage
pub struct PipelineContext {
    config: Arc<ReviewConfig>,
    chunker: Chunker,
    client: CompletionClient,
    prompts: Prompts,
    permits: Arc<Semaphore>,
    cancel: CancellationToken,
}

impl PipelineContext {
    /// Build a context from a configuration; the configuration is validated first
    pub fn new(
        config: Arc<ReviewConfig>,
        tokenizer: Arc<TokenizerAdapter>,
        client: CompletionClient,
        cancel: CancellationToken,
    ) -> PipelineResult<Self> {
        config.validate()?;
        let chunker = Chunker::new(tokenizer, config.model.clone(), config.max_tokens_per_chunk)?;

        Ok(Self {
            prompts: Prompts::new(config.response_language.clone()),
            permits: Arc::new(Semaphore::new(config.max_concurrency)),
            config,
            chunker,
            client,
            cancel,
        })
    }

    pub fn config(&self) -> &ReviewConfig {
        &self.config
    }

    pub fn chunker(&self) -> &Chunker {
        &self.chunker
    }

    pub fn prompts(&self) -> &Prompts {
        &self.prompts
    }

    /// Fail with [`PipelineError::Cancelled`] once the run was cancelled
    pub fn ensure_active(&self) -> PipelineResult<()> {
        if self.cancel.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        Ok(())
    }

    /// One model call under the concurrency limit, raced against cancellation
    ///
    /// A failed call yields an empty string; only cancellation is an error.
    pub async fn complete(&self, system_prompt: &str, user_content: String) -> PipelineResult<String> {
        self.ensure_active()?;

        let request = CompletionRequest {
            system_prompt: system_prompt.to_string(),
            user_content,
            model: self.config.model.clone(),
            temperature: self.config.temperature,
            max_response_tokens: self.config.max_response_tokens,
        };

        let call = async {
            let _permit = self
                .permits
                .acquire()
                .await
                .map_err(|_| PipelineError::Cancelled)?;
            Ok::<_, PipelineError>(self.client.complete(&request).await)
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PipelineError::Cancelled),
            result = call => result,
        }
    }

    /// Run one call per chunk and return the results in chunk order
    ///
    /// Up to `max_concurrency` calls run at once; an empty result is logged and
    /// kept so the remaining chunks are still processed.
    pub async fn complete_chunks<F>(
        &self,
        phase: &str,
        system_prompt: &str,
        chunks: Vec<Chunk>,
        payload: F,
    ) -> PipelineResult<Vec<ChunkResult>>
    where
        F: Fn(&Chunk) -> String,
    {
        let payload = &payload;
        let total = chunks.len();

        stream::iter(chunks)
            .map(move |chunk| async move {
                debug!(phase, part = chunk.index, of = total, tokens = chunk.token_count(), "Requesting completion");
                let text = self.complete(system_prompt, payload(&chunk)).await?;
                if text.is_empty() {
                    warn!(phase, part = chunk.index, "No response for part, continuing");
                }
                Ok::<_, PipelineError>(ChunkResult::new(chunk.index, text))
            })
            .buffered(self.config.max_concurrency)
            .try_collect()
            .await
    }
}
