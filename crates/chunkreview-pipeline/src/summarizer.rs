//! Per-document summary pass

use std::sync::Arc;

use tracing::info;

use crate::context::PipelineContext;
use crate::document::Document;
use crate::error::PipelineResult;
use crate::models::DocumentSummary;

/// Summarizes one document chunk by chunk
#[derive(Clone)]
pub struct SummaryStage {
    context: Arc<PipelineContext>,
}

impl SummaryStage {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Summarize every chunk of `document`; failed chunks stay as empty parts
    pub async fn summarize(&self, document: &Document) -> PipelineResult<DocumentSummary> {
        let chunks = self.context.chunker().chunk(document.content())?;
        info!(document = %document.name(), chunks = chunks.len(), "Summarizing document");

        let prompt = self.context.prompts().summary();
        let parts = self
            .context
            .complete_chunks("summary", &prompt, chunks, |chunk| chunk.text.clone())
            .await?;

        Ok(DocumentSummary::new(document.name(), parts))
    }
}
