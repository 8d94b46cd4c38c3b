//! Input documents

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// A named text read once at pipeline entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    name: String,
    path: PathBuf,
    content: String,
}

impl Document {
    /// Create an in-memory document
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            path: PathBuf::from(&name),
            name,
            content: content.into(),
        }
    }

    /// Read a UTF-8 file
    ///
    /// A missing or unreadable file is [`PipelineError::Unreadable`]; content
    /// that is not UTF-8 is [`PipelineError::InvalidEncoding`].
    pub async fn read(path: &Path) -> PipelineResult<Self> {
        let unreadable = |reason: String| PipelineError::Unreadable {
            path: path.to_path_buf(),
            reason,
        };

        let metadata = tokio::fs::metadata(path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => unreadable("file not found".to_string()),
            _ => unreadable(e.to_string()),
        })?;
        if !metadata.is_file() {
            return Err(unreadable("not a regular file".to_string()));
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| unreadable(e.to_string()))?;
        let content = String::from_utf8(bytes).map_err(|_| PipelineError::InvalidEncoding {
            path: path.to_path_buf(),
        })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!(document = %name, bytes = content.len(), "Read document");

        Ok(Self {
            name,
            path: path.to_path_buf(),
            content,
        })
    }

    /// Display name (the file name component)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path the document was read from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full text
    pub fn content(&self) -> &str {
        &self.content
    }
}
