//! Intermediate and final results of the pipeline

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::prompts::summary_line;

const NO_RESPONSE: &str = "(no response)";

/// Model response for one chunk; empty when the call failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkResult {
    /// 1-based chunk position
    pub index: usize,
    pub text: String,
}

impl ChunkResult {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Whether the call for this chunk produced nothing
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Ordered chunk summaries of one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSummary {
    pub document: String,
    pub parts: Vec<ChunkResult>,
}

impl DocumentSummary {
    pub fn new(document: impl Into<String>, parts: Vec<ChunkResult>) -> Self {
        Self {
            document: document.into(),
            parts,
        }
    }

    /// Labeled summary lines joined with newlines
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .map(|part| summary_line(part.index, &part.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Per-document summaries in input order, fed to the architecture pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectOverview {
    sections: Vec<(String, String)>,
}

impl ProjectOverview {
    pub fn from_summaries(summaries: &[DocumentSummary]) -> Self {
        Self {
            sections: summaries
                .iter()
                .map(|summary| (summary.document.clone(), summary.text()))
                .collect(),
        }
    }

    /// Names of the documents in the overview, in input order
    pub fn document_names(&self) -> Vec<String> {
        self.sections.iter().map(|(name, _)| name.clone()).collect()
    }

    /// `### name` headed blocks separated by blank lines
    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(|(name, summary)| format!("### {}\n{}", name, summary))
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// Which pipeline produced a result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum AnalysisKind {
    /// Single-file review
    Review { document: String },
    /// Multi-file summary and architecture pass
    Aggregate { documents: Vec<String> },
}

/// Final output of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResult {
    pub kind: AnalysisKind,
    /// Per-file summaries (aggregate runs only)
    pub summaries: Vec<DocumentSummary>,
    /// Ordered per-chunk results of the final phase
    pub sections: Vec<ChunkResult>,
    /// Inputs skipped because they could not be read
    pub skipped: Vec<PathBuf>,
}

impl AnalysisResult {
    /// Human-readable report
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Number of final sections whose call failed
    pub fn failed_sections(&self) -> usize {
        self.sections.iter().filter(|s| s.is_empty()).count()
    }
}

fn or_placeholder(text: &str) -> &str {
    if text.is_empty() {
        NO_RESPONSE
    } else {
        text
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for summary in &self.summaries {
            writeln!(f, "=== Summary of file {} ===", summary.document)?;
            for part in &summary.parts {
                writeln!(f, "{}", summary_line(part.index, or_placeholder(&part.text)))?;
            }
            writeln!(f)?;
        }

        match &self.kind {
            AnalysisKind::Review { document } => {
                writeln!(f, "=== Code review of file {} ===", document)?
            }
            AnalysisKind::Aggregate { .. } => writeln!(f, "=== Project overview ===")?,
        }

        for (i, section) in self.sections.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "--- Result of part {} ---", section.index)?;
            writeln!(f, "{}", or_placeholder(&section.text))?;
        }

        if !self.skipped.is_empty() {
            let skipped: Vec<String> = self.skipped.iter().map(|p| p.display().to_string()).collect();
            writeln!(f)?;
            writeln!(f, "Skipped unreadable files: {}", skipped.join(", "))?;
        }

        Ok(())
    }
}
