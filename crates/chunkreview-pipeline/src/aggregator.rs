//! Multi-document aggregation
//!
//! Every readable document is summarized first. Only once all summaries are
//! in does the architecture pass start: the summaries are joined into a
//! project overview, which is chunked again like any other text.

use std::path::PathBuf;
use std::sync::Arc;

use futures::{stream, StreamExt, TryStreamExt};
use tracing::{info, warn};

use crate::context::PipelineContext;
use crate::document::Document;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{AnalysisKind, AnalysisResult, ChunkResult, ProjectOverview};
use crate::prompts::overview_payload;
use crate::summarizer::SummaryStage;

/// Cross-module analysis over a project overview
#[derive(Clone)]
pub struct ArchitectureStage {
    context: Arc<PipelineContext>,
}

impl ArchitectureStage {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Chunk the overview and analyze each chunk with every file name in the instruction
    pub async fn analyze(&self, overview: &ProjectOverview) -> PipelineResult<Vec<ChunkResult>> {
        let chunks = self.context.chunker().chunk(&overview.render())?;
        info!(
            documents = overview.document_names().len(),
            chunks = chunks.len(),
            "Analyzing project overview"
        );

        let prompt = self.context.prompts().architecture(&overview.document_names());
        self.context
            .complete_chunks("architecture", &prompt, chunks, |chunk| {
                overview_payload(chunk.index, &chunk.text)
            })
            .await
    }
}

/// Summarizes each document, then runs the architecture pass over the summaries
#[derive(Clone)]
pub struct Aggregator {
    context: Arc<PipelineContext>,
    summaries: SummaryStage,
    architecture: ArchitectureStage,
}

impl Aggregator {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self {
            summaries: SummaryStage::new(context.clone()),
            architecture: ArchitectureStage::new(context.clone()),
            context,
        }
    }

    /// Aggregate the given files; unreadable files are skipped with a warning
    pub async fn aggregate(&self, paths: &[PathBuf]) -> PipelineResult<AnalysisResult> {
        let mut documents = Vec::with_capacity(paths.len());
        let mut skipped = Vec::new();

        for path in paths {
            self.context.ensure_active()?;
            match Document::read(path).await {
                Ok(document) => documents.push(document),
                Err(PipelineError::Unreadable { path, reason }) => {
                    warn!(path = %path.display(), %reason, "Skipping unreadable file");
                    skipped.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        let names: Vec<String> = documents.iter().map(|d| d.name().to_string()).collect();
        if documents.is_empty() {
            warn!(skipped = skipped.len(), "No readable documents to aggregate");
            return Ok(AnalysisResult {
                kind: AnalysisKind::Aggregate { documents: names },
                summaries: Vec::new(),
                sections: Vec::new(),
                skipped,
            });
        }

        info!(documents = documents.len(), skipped = skipped.len(), "Summarizing documents");

        let summaries = stream::iter(&documents)
            .map(|document| self.summaries.summarize(document))
            .buffered(self.context.config().max_concurrency)
            .try_collect::<Vec<_>>()
            .await?;

        let overview = ProjectOverview::from_summaries(&summaries);
        let sections = self.architecture.analyze(&overview).await?;

        Ok(AnalysisResult {
            kind: AnalysisKind::Aggregate { documents: names },
            summaries,
            sections,
            skipped,
        })
    }
}
