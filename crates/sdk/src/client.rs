//! Main client for the Perplexity SDK.

use crate::api::ChatApi;
use crate::config::{ClientConfig, DEFAULT_BASE_URL};
use crate::error::{PerplexityError, PerplexityResult};
use crate::transport::HttpTransport;
use std::sync::Arc;
use url::Url;

/// Main client for interacting with the Perplexity API.
#[derive(Debug, Clone)]
pub struct PerplexityClient {
    config: Arc<ClientConfig>,
    pub(crate) http: HttpTransport,
}

impl PerplexityClient {
    /// Create a new client builder.
    pub fn builder() -> PerplexityClientBuilder {
        PerplexityClientBuilder::new()
    }

    /// Create a client from configuration.
    pub fn from_config(config: ClientConfig) -> PerplexityResult<Self> {
        let config = Arc::new(config);
        let http = HttpTransport::new(config.clone())?;

        Ok(Self { config, http })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &Url {
        &self.config.base_url
    }

    /// Get the chat completions API.
    pub fn chat(&self) -> ChatApi<'_> {
        ChatApi::new(self)
    }
}

/// Builder for creating a PerplexityClient.
pub struct PerplexityClientBuilder {
    base_url: Option<String>,
    api_key: Option<String>,
}

impl PerplexityClientBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_key: None,
        }
    }

    /// Set the base URL; defaults to the public API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the API key for authentication.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> PerplexityResult<PerplexityClient> {
        let api_key = self
            .api_key
            .ok_or_else(|| PerplexityError::Config("api_key is required".to_string()))?;

        let base_url = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL))?;

        PerplexityClient::from_config(ClientConfig::new(base_url, api_key))
    }
}

impl Default for PerplexityClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
