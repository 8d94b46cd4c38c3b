//! Single-document review

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use crate::context::PipelineContext;
use crate::document::Document;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{AnalysisKind, AnalysisResult};
use crate::prompts::review_payload;

/// Reviews one document chunk by chunk
#[derive(Clone)]
pub struct Reviewer {
    context: Arc<PipelineContext>,
}

impl Reviewer {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Read and review a file
    ///
    /// An unreadable file gives an empty result that lists it as skipped.
    pub async fn review_path(&self, path: &Path) -> PipelineResult<AnalysisResult> {
        match Document::read(path).await {
            Ok(document) => self.review(&document).await,
            Err(PipelineError::Unreadable { path, reason }) => {
                warn!(path = %path.display(), %reason, "Skipping unreadable file");
                Ok(AnalysisResult {
                    kind: AnalysisKind::Review {
                        document: path.display().to_string(),
                    },
                    summaries: Vec::new(),
                    sections: Vec::new(),
                    skipped: vec![path],
                })
            }
            Err(e) => Err(e),
        }
    }

    /// Review every chunk of `document`
    pub async fn review(&self, document: &Document) -> PipelineResult<AnalysisResult> {
        let chunks = self.context.chunker().chunk(document.content())?;
        info!(document = %document.name(), chunks = chunks.len(), "Reviewing document");

        let prompt = self.context.prompts().review();
        let name = document.name();
        let sections = self
            .context
            .complete_chunks("review", &prompt, chunks, |chunk| {
                review_payload(chunk.index, name, &chunk.text)
            })
            .await?;

        Ok(AnalysisResult {
            kind: AnalysisKind::Review {
                document: name.to_string(),
            },
            summaries: Vec::new(),
            sections,
            skipped: Vec::new(),
        })
    }
}
