//! API key management for secure credential handling
//!
//! Keys are read from the environment variable registered for the provider.
//! Error messages never contain key material.

use std::collections::HashMap;

use crate::error::ProviderError;
use crate::models::ApiKeyConfig;

/// Environment variable holding the OpenAI key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Manages API keys for providers
pub struct ApiKeyManager {
    /// API key configurations (provider_id -> config)
    configs: HashMap<String, ApiKeyConfig>,
}

impl ApiKeyManager {
    /// Create a new API key manager
    pub fn new() -> Self {
        Self {
            configs: HashMap::new(),
        }
    }

    /// Create a manager that knows where the OpenAI key lives
    pub fn with_openai_defaults() -> Self {
        let mut manager = Self::new();
        manager.register_config(
            "openai".to_string(),
            ApiKeyConfig {
                env_var: OPENAI_API_KEY_VAR.to_string(),
            },
        );
        manager
    }

    /// Register an API key configuration for a provider
    pub fn register_config(&mut self, provider_id: String, config: ApiKeyConfig) {
        self.configs.insert(provider_id, config);
    }

    /// Get an API key using a custom variable lookup
    ///
    /// The registered variable is read through `lookup`. Blank values count
    /// as missing.
    pub fn resolve<F>(&self, provider_id: &str, lookup: F) -> Result<String, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(config) = self.configs.get(provider_id) {
            if let Some(key) = lookup(&config.env_var).filter(|k| !k.trim().is_empty()) {
                return Ok(key);
            }
            return Err(ProviderError::ConfigError(format!(
                "API key not found for provider '{}' (set {})",
                provider_id, config.env_var
            )));
        }

        Err(ProviderError::ConfigError(format!(
            "API key not found for provider '{}'",
            provider_id
        )))
    }
}

impl Default for ApiKeyManager {
    fn default() -> Self {
        Self::new()
    }
}
