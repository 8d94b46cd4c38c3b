//! Chooses between single-file review and multi-file aggregation

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::aggregator::Aggregator;
use crate::context::PipelineContext;
use crate::error::{PipelineError, PipelineResult};
use crate::models::AnalysisResult;
use crate::reviewer::Reviewer;

/// Pipeline used for a given number of inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineMode {
    Review,
    Aggregate,
}

impl PipelineMode {
    /// One input is reviewed; several are aggregated; none is an error
    pub fn for_count(count: usize) -> PipelineResult<Self> {
        match count {
            0 => Err(PipelineError::NoDocuments),
            1 => Ok(PipelineMode::Review),
            _ => Ok(PipelineMode::Aggregate),
        }
    }
}

/// Entry point of the pipeline
pub struct PipelineSelector {
    context: Arc<PipelineContext>,
}

impl PipelineSelector {
    pub fn new(context: Arc<PipelineContext>) -> Self {
        Self { context }
    }

    /// Run the pipeline matching the number of paths
    pub async fn run(&self, paths: &[PathBuf]) -> PipelineResult<AnalysisResult> {
        let mode = PipelineMode::for_count(paths.len())?;
        info!(?mode, documents = paths.len(), model = %self.context.config().model, "Starting analysis");

        match (mode, paths) {
            (PipelineMode::Review, [path]) => Reviewer::new(self.context.clone()).review_path(path).await,
            _ => Aggregator::new(self.context.clone()).aggregate(paths).await,
        }
    }
}
