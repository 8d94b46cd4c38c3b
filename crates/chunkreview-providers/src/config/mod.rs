//! Provider connection settings resolved from the environment
//!
//! Resolution happens once at startup. Components receive the resulting
//! [`ProviderSettings`] and never read the environment themselves.

use std::time::Duration;

use tracing::info;

use crate::api_key::ApiKeyManager;
use crate::error::ProviderError;
use crate::models::ProviderSettings;

/// Overrides the OpenAI endpoint (self-hosted gateways, Azure-compatible proxies)
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";

/// Overrides the per-request timeout, in seconds
pub const TIMEOUT_VAR: &str = "CHUNKREVIEW_REQUEST_TIMEOUT";

/// Proxy variables in the order they are consulted
pub const PROXY_VARS: [&str; 4] = ["HTTPS_PROXY", "https_proxy", "HTTP_PROXY", "http_proxy"];

/// Configuration manager for provider settings
pub struct ConfigurationManager {
    api_keys: ApiKeyManager,
}

impl ConfigurationManager {
    /// Create a configuration manager for the OpenAI provider
    pub fn new() -> Self {
        Self {
            api_keys: ApiKeyManager::with_openai_defaults(),
        }
    }

    /// Resolve settings using a custom variable lookup
    pub fn load_with<F>(&self, lookup: F) -> Result<ProviderSettings, ProviderError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = self.api_keys.resolve("openai", &lookup)?;

        let base_url = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty());

        let proxy = PROXY_VARS.iter().find_map(|var| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .map(|value| (*var, value))
        });
        let proxy = proxy.map(|(var, value)| {
            info!(variable = var, "Using proxy from environment");
            value
        });

        let timeout = match lookup(TIMEOUT_VAR) {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ProviderError::ConfigError(format!("{} must be a whole number of seconds, got '{}'", TIMEOUT_VAR, raw))
                })?;
                if secs == 0 {
                    return Err(ProviderError::ConfigError(format!("{} must be greater than zero", TIMEOUT_VAR)));
                }
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(ProviderSettings {
            api_key: Some(api_key),
            base_url,
            proxy,
            timeout,
        })
    }
}

impl Default for ConfigurationManager {
    fn default() -> Self {
        Self::new()
    }
}
