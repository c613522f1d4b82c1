//! Configuration types for the Perplexity SDK.

use crate::error::{PerplexityError, PerplexityResult};
use url::Url;

/// Default base URL of the Perplexity API.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai";

/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "PERPLEXITY_API_KEY";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "PERPLEXITY_BASE_URL";

/// Configuration for the Perplexity client.
#[derive(Clone)]
pub struct ClientConfig {
    /// Base URL of the Perplexity API.
    pub base_url: Url,
    /// API key sent as a bearer token.
    pub api_key: String,
}

impl ClientConfig {
    /// Create a new configuration with the given base URL and key.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> PerplexityResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> PerplexityResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_ENV)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                PerplexityError::Config(format!("{} environment variable is required", API_KEY_ENV))
            })?;

        let base_url = match lookup(BASE_URL_ENV).filter(|url| !url.trim().is_empty()) {
            Some(url) => Url::parse(&url)?,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        Ok(Self { base_url, api_key })
    }
}

// The API key never shows up in logs.
impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}
