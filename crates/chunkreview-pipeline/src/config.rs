//! Review configuration
//!
//! Layers, lowest precedence first: built-in defaults, a YAML file, the
//! environment, then explicit overrides from the command line. The merged value
//! is validated once and shared with every stage.

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};

/// Project-level configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = ".chunkreview.yaml";

pub const MODEL_VAR: &str = "CHUNKREVIEW_MODEL";
pub const MAX_TOKENS_PER_CHUNK_VAR: &str = "CHUNKREVIEW_MAX_TOKENS_PER_CHUNK";
pub const MAX_RESPONSE_TOKENS_VAR: &str = "CHUNKREVIEW_MAX_RESPONSE_TOKENS";
pub const TEMPERATURE_VAR: &str = "CHUNKREVIEW_TEMPERATURE";
pub const LANGUAGE_VAR: &str = "CHUNKREVIEW_LANGUAGE";
pub const CONCURRENCY_VAR: &str = "CHUNKREVIEW_CONCURRENCY";

/// Settings shared by every pipeline stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewConfig {
    /// Model identifier sent to the provider and used to pick the encoding
    pub model: String,
    /// Token ceiling for one chunk of input
    pub max_tokens_per_chunk: usize,
    /// Ceiling on generated tokens per request
    pub max_response_tokens: usize,
    /// Sampling temperature
    pub temperature: f32,
    /// Language the model should answer in
    pub response_language: Option<String>,
    /// Maximum number of model calls in flight
    pub max_concurrency: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens_per_chunk: 3000,
            max_response_tokens: 1500,
            temperature: 0.2,
            response_language: None,
            max_concurrency: 1,
        }
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReviewOverrides {
    pub model: Option<String>,
    pub max_tokens_per_chunk: Option<usize>,
    pub max_response_tokens: Option<usize>,
    pub temperature: Option<f32>,
    pub response_language: Option<String>,
    pub max_concurrency: Option<usize>,
}

impl ReviewConfig {
    /// Resolve the full configuration
    ///
    /// An explicit `config_file` must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// in the working directory is used when present.
    pub fn load<F>(
        config_file: Option<&Path>,
        lookup: F,
        overrides: &ReviewOverrides,
    ) -> PipelineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                let project = Path::new(DEFAULT_CONFIG_FILE);
                if project.is_file() {
                    Self::from_file(project)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(lookup)?;
        config.apply_overrides(overrides);
        config.validate()?;

        debug!(?config, "Resolved review configuration");
        Ok(config)
    }

    /// Load a YAML file; fields it omits keep their defaults
    pub fn from_file(path: &Path) -> PipelineResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PipelineError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            PipelineError::Config(format!("Failed to parse YAML config {}: {}", path.display(), e))
        })
    }

    /// Apply environment variables read through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> PipelineResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = get(MODEL_VAR) {
            self.model = model.trim().to_string();
        }
        if let Some(raw) = get(MAX_TOKENS_PER_CHUNK_VAR) {
            self.max_tokens_per_chunk = parse_var(MAX_TOKENS_PER_CHUNK_VAR, &raw)?;
        }
        if let Some(raw) = get(MAX_RESPONSE_TOKENS_VAR) {
            self.max_response_tokens = parse_var(MAX_RESPONSE_TOKENS_VAR, &raw)?;
        }
        if let Some(raw) = get(TEMPERATURE_VAR) {
            self.temperature = parse_var(TEMPERATURE_VAR, &raw)?;
        }
        if let Some(language) = get(LANGUAGE_VAR) {
            self.response_language = Some(language.trim().to_string());
        }
        if let Some(raw) = get(CONCURRENCY_VAR) {
            self.max_concurrency = parse_var(CONCURRENCY_VAR, &raw)?;
        }

        Ok(())
    }

    /// Apply command-line values; unset fields are left alone
    pub fn apply_overrides(&mut self, overrides: &ReviewOverrides) {
        if let Some(model) = &overrides.model {
            self.model = model.clone();
        }
        if let Some(max) = overrides.max_tokens_per_chunk {
            self.max_tokens_per_chunk = max;
        }
        if let Some(max) = overrides.max_response_tokens {
            self.max_response_tokens = max;
        }
        if let Some(temperature) = overrides.temperature {
            self.temperature = temperature;
        }
        if let Some(language) = &overrides.response_language {
            self.response_language = Some(language.clone());
        }
        if let Some(concurrency) = overrides.max_concurrency {
            self.max_concurrency = concurrency;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> PipelineResult<()> {
        if self.model.trim().is_empty() {
            return Err(PipelineError::Config("Model name cannot be empty".to_string()));
        }

        if self.max_tokens_per_chunk == 0 {
            return Err(PipelineError::Config(
                "max_tokens_per_chunk must be greater than 0".to_string(),
            ));
        }

        if self.max_response_tokens == 0 {
            return Err(PipelineError::Config(
                "max_response_tokens must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(PipelineError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                self.temperature
            )));
        }

        if self.max_concurrency == 0 {
            return Err(PipelineError::Config(
                "max_concurrency must be at least 1".to_string(),
            ));
        }

        if matches!(&self.response_language, Some(language) if language.trim().is_empty()) {
            return Err(PipelineError::Config(
                "response_language cannot be blank".to_string(),
            ));
        }

        Ok(())
    }
}

fn parse_var<T: FromStr>(name: &str, raw: &str) -> PipelineResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| PipelineError::Config(format!("{} has an invalid value '{}'", name, raw)))
}
