//! ChunkReview Tokens - tokenizer adapter and token-window chunker
//!
//! Text is converted to BPE token ids with `tiktoken-rs`, split into fixed-size
//! windows and decoded back, so every request stays under a hard token ceiling.

pub mod chunker;
pub mod error;
pub mod tokenizer;

pub use chunker::{Chunk, Chunker};
pub use error::{TokenizerError, TokenizerResult};
pub use tokenizer::{Encoding, TokenSequence, TokenizerAdapter};
