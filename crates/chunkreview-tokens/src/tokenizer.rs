//! Tokenizer adapter backed by tiktoken BPE encodings
//!
//! Model names are mapped to an encoding by prefix. Names that match no known
//! family fall back to `cl100k_base`, so newly released or third-party model
//! names still tokenize the same way on every run.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, Mutex};

use tiktoken_rs::CoreBPE;
use tracing::debug;

use crate::error::{TokenizerError, TokenizerResult};

/// BPE encodings understood by the adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// GPT-4o / o-series encoding
    O200kBase,
    /// GPT-4 / GPT-3.5 encoding
    Cl100kBase,
    /// Codex / text-davinci-002+ encoding
    P50kBase,
    /// GPT-3 / GPT-2 encoding
    R50kBase,
}

/// Model-name prefixes and their encodings, most specific first
const MODEL_PREFIXES: &[(&str, Encoding)] = &[
    ("gpt-4o", Encoding::O200kBase),
    ("chatgpt-4o", Encoding::O200kBase),
    ("gpt-4.1", Encoding::O200kBase),
    ("gpt-4.5", Encoding::O200kBase),
    ("gpt-5", Encoding::O200kBase),
    ("o1", Encoding::O200kBase),
    ("o3", Encoding::O200kBase),
    ("o4", Encoding::O200kBase),
    ("gpt-4", Encoding::Cl100kBase),
    ("gpt-3.5", Encoding::Cl100kBase),
    ("gpt-35", Encoding::Cl100kBase),
    ("text-embedding-", Encoding::Cl100kBase),
    ("text-davinci-002", Encoding::P50kBase),
    ("text-davinci-003", Encoding::P50kBase),
    ("code-", Encoding::P50kBase),
    ("text-davinci-001", Encoding::R50kBase),
    ("davinci", Encoding::R50kBase),
    ("curie", Encoding::R50kBase),
    ("babbage", Encoding::R50kBase),
    ("ada", Encoding::R50kBase),
    ("gpt2", Encoding::R50kBase),
];

impl Encoding {
    /// Encoding used for any model name without a known family
    pub const FALLBACK: Encoding = Encoding::Cl100kBase;

    /// Select the encoding for a model name
    pub fn for_model(model: &str) -> Self {
        Self::lookup(model).unwrap_or(Self::FALLBACK)
    }

    /// Whether the model name belongs to a known family
    pub fn is_known_model(model: &str) -> bool {
        Self::lookup(model).is_some()
    }

    fn lookup(model: &str) -> Option<Self> {
        let model = model.trim().to_ascii_lowercase();
        MODEL_PREFIXES
            .iter()
            .find(|(prefix, _)| model.starts_with(prefix))
            .map(|(_, encoding)| *encoding)
    }

    /// tiktoken name of the encoding
    pub fn name(&self) -> &'static str {
        match self {
            Encoding::O200kBase => "o200k_base",
            Encoding::Cl100kBase => "cl100k_base",
            Encoding::P50kBase => "p50k_base",
            Encoding::R50kBase => "r50k_base",
        }
    }

    fn load(&self) -> TokenizerResult<CoreBPE> {
        let loaded = match self {
            Encoding::O200kBase => tiktoken_rs::o200k_base(),
            Encoding::Cl100kBase => tiktoken_rs::cl100k_base(),
            Encoding::P50kBase => tiktoken_rs::p50k_base(),
            Encoding::R50kBase => tiktoken_rs::r50k_base(),
        };
        loaded.map_err(|e| TokenizerError::EncodingUnavailable {
            encoding: self.name().to_string(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Token ids produced for one (model, text) pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSequence {
    encoding: Encoding,
    ids: Vec<usize>,
}

impl TokenSequence {
    /// Encoding the ids belong to
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Token ids in order
    pub fn ids(&self) -> &[usize] {
        &self.ids
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the sequence holds no tokens
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Consume the sequence and return the raw ids
    pub fn into_ids(self) -> Vec<usize> {
        self.ids
    }
}

/// Converts text to and from token ids for a named model
///
/// Loaded BPE tables are cached per encoding; building one takes noticeably
/// longer than encoding a large file.
pub struct TokenizerAdapter {
    cache: Mutex<HashMap<Encoding, Arc<CoreBPE>>>,
    unknown_models: Mutex<HashSet<String>>,
}

impl TokenizerAdapter {
    /// Create a new adapter with an empty encoding cache
    pub fn new() -> Self {
        Self {
            cache: Mutex::new(HashMap::new()),
            unknown_models: Mutex::new(HashSet::new()),
        }
    }

    /// Encoding that will be used for a model name
    pub fn encoding_for(&self, model: &str) -> Encoding {
        let encoding = Encoding::for_model(model);
        if !Encoding::is_known_model(model) {
            let first_seen = self
                .unknown_models
                .lock()
                .map(|mut seen| seen.insert(model.to_string()))
                .unwrap_or(false);
            if first_seen {
                debug!(model = %model, encoding = %encoding, "Unknown model, using fallback encoding");
            }
        }
        encoding
    }

    /// Tokenize text for a model
    ///
    /// Special-token markers in the text are encoded as ordinary text.
    pub fn tokenize(&self, text: &str, model: &str) -> TokenizerResult<TokenSequence> {
        let encoding = self.encoding_for(model);
        let bpe = self.bpe(encoding)?;
        Ok(TokenSequence {
            encoding,
            ids: bpe.encode_ordinary(text),
        })
    }

    /// Decode token ids back to text for a model
    pub fn detokenize(&self, tokens: &[usize], model: &str) -> TokenizerResult<String> {
        let bpe = self.bpe(self.encoding_for(model))?;
        Ok(decode_window(&bpe, tokens))
    }

    /// Count tokens in text for a model
    pub fn count_tokens(&self, text: &str, model: &str) -> TokenizerResult<usize> {
        Ok(self.tokenize(text, model)?.len())
    }

    /// Number of encodings currently loaded
    pub fn cached_encodings(&self) -> usize {
        self.cache.lock().map(|c| c.len()).unwrap_or(0)
    }

    fn bpe(&self, encoding: Encoding) -> TokenizerResult<Arc<CoreBPE>> {
        if let Ok(cache) = self.cache.lock() {
            if let Some(bpe) = cache.get(&encoding) {
                return Ok(Arc::clone(bpe));
            }
        }

        debug!(encoding = %encoding, "Loading BPE table");
        let bpe = Arc::new(encoding.load()?);

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(encoding, Arc::clone(&bpe));
        }

        Ok(bpe)
    }
}

impl Default for TokenizerAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a token window, replacing bytes of a character split by the cut
///
/// A window boundary can fall inside a multi-byte character at either end.
/// Only the dangling bytes become U+FFFD; every complete character in the
/// window is kept.
fn decode_window(bpe: &CoreBPE, tokens: &[usize]) -> String {
    String::from_utf8_lossy(&bpe._decode_native(tokens)).into_owned()
}
