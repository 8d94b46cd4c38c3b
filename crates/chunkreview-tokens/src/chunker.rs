//! Fixed-size token window chunker
//!
//! The text is tokenized once and the token ids are cut into consecutive,
//! non-overlapping windows of `max_tokens_per_chunk`; only the last window may
//! be shorter. Each window is decoded on its own, so the concatenated token
//! ranges always reproduce the original ids while the decoded text may differ
//! from the source at a cut that lands inside a multi-byte character.

use std::ops::Range;
use std::sync::Arc;

use tracing::debug;

use crate::error::{TokenizerError, TokenizerResult};
use crate::tokenizer::TokenizerAdapter;

/// A position-tagged window of a document's tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position within the parent text
    pub index: usize,
    /// Range of the window within the parent token sequence
    pub token_range: Range<usize>,
    /// Token ids of the window
    pub tokens: Vec<usize>,
    /// Decoded text sent to the model
    pub text: String,
}

impl Chunk {
    /// Number of tokens in the chunk
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

/// Splits text into token windows for one model
#[derive(Clone)]
pub struct Chunker {
    tokenizer: Arc<TokenizerAdapter>,
    model: String,
    max_tokens_per_chunk: usize,
}

impl Chunker {
    /// Create a chunker; a zero window size is rejected
    pub fn new(
        tokenizer: Arc<TokenizerAdapter>,
        model: impl Into<String>,
        max_tokens_per_chunk: usize,
    ) -> TokenizerResult<Self> {
        if max_tokens_per_chunk == 0 {
            return Err(TokenizerError::InvalidChunkSize(max_tokens_per_chunk));
        }

        Ok(Self {
            tokenizer,
            model: model.into(),
            max_tokens_per_chunk,
        })
    }

    /// Model whose encoding is used
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Window size in tokens
    pub fn max_tokens_per_chunk(&self) -> usize {
        self.max_tokens_per_chunk
    }

    /// Number of chunks produced for a given token count
    pub fn chunk_count_for(&self, token_count: usize) -> usize {
        token_count.div_ceil(self.max_tokens_per_chunk)
    }

    /// Split text into ordered chunks; empty text yields no chunks
    pub fn chunk(&self, text: &str) -> TokenizerResult<Vec<Chunk>> {
        let sequence = self.tokenizer.tokenize(text, &self.model)?;
        let ids = sequence.ids();

        debug!(
            model = %self.model,
            encoding = %sequence.encoding(),
            tokens = ids.len(),
            chunks = self.chunk_count_for(ids.len()),
            "Chunking text"
        );

        let mut chunks = Vec::with_capacity(self.chunk_count_for(ids.len()));
        for (offset, window) in ids.chunks(self.max_tokens_per_chunk).enumerate() {
            let start = offset * self.max_tokens_per_chunk;
            let text = self.tokenizer.detokenize(window, &self.model)?;

            chunks.push(Chunk {
                index: offset + 1,
                token_range: start..start + window.len(),
                tokens: window.to_vec(),
                text,
            });
        }

        Ok(chunks)
    }
}
