//! ChunkReview Pipeline - two-level map-reduce over chunked documents
//!
//! A single document is reviewed chunk by chunk. Several documents are first
//! summarized chunk by chunk, the summaries are joined into a project overview,
//! and the overview is re-chunked for a cross-module architecture pass.

pub mod aggregator;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod models;
pub mod prompts;
pub mod reviewer;
pub mod selector;
pub mod summarizer;

pub use aggregator::{Aggregator, ArchitectureStage};
pub use config::{ReviewConfig, ReviewOverrides, DEFAULT_CONFIG_FILE};
pub use context::PipelineContext;
pub use document::Document;
pub use error::{PipelineError, PipelineResult};
pub use models::{AnalysisKind, AnalysisResult, ChunkResult, DocumentSummary, ProjectOverview};
pub use prompts::Prompts;
pub use reviewer::Reviewer;
pub use selector::{PipelineMode, PipelineSelector};
pub use summarizer::SummaryStage;
