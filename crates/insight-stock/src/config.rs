//! Configuration for stock insight runs

use crate::error::{Result, StockError};
use insight_llm::ProviderKind;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a stock insight run
///
/// Explicit state passed to the components that need it: provider selection,
/// API key resolution, cache location, and news-client tuning.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// AI provider to generate insights with
    pub provider: ProviderKind,

    /// Explicit API key; falls back to the provider's environment variable
    pub api_key: Option<String>,

    /// Directory for on-disk insight records
    pub cache_dir: PathBuf,

    /// Per-request timeout for HTTP calls
    pub request_timeout: Duration,

    /// Maximum news headlines per symbol
    pub news_limit: usize,

    /// News requests per minute
    pub news_rate_limit: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            api_key: None,
            cache_dir: PathBuf::from("cache"),
            request_timeout: Duration::from_secs(30),
            news_limit: 5,
            news_rate_limit: 60,
        }
    }
}

impl AppConfig {
    /// Create a new configuration builder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Resolve the API key: explicit value first, then the environment
    /// variable matching the selected provider
    pub fn resolve_api_key(&self) -> Result<String> {
        if let Some(key) = &self.api_key {
            return Ok(key.clone());
        }

        let var = match self.provider {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
        };
        std::env::var(var).map_err(|_| {
            StockError::Config(format!(
                "No API key provided and {var} environment variable not set"
            ))
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.news_limit == 0 {
            return Err(StockError::Config(
                "news_limit must be greater than 0".to_string(),
            ));
        }
        if self.news_rate_limit == 0 {
            return Err(StockError::Config(
                "news_rate_limit must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    cache_dir: Option<PathBuf>,
    request_timeout: Option<Duration>,
    news_limit: Option<usize>,
    news_rate_limit: Option<u32>,
}

impl AppConfigBuilder {
    /// Set the AI provider
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set an explicit API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the insight cache directory
    pub fn cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the HTTP request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Set the news headline limit per symbol
    pub fn news_limit(mut self, limit: usize) -> Self {
        self.news_limit = Some(limit);
        self
    }

    /// Set the news requests-per-minute rate limit
    pub fn news_rate_limit(mut self, limit: u32) -> Self {
        self.news_rate_limit = Some(limit);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig> {
        let defaults = AppConfig::default();

        let config = AppConfig {
            provider: self.provider.unwrap_or(defaults.provider),
            api_key: self.api_key,
            cache_dir: self.cache_dir.unwrap_or(defaults.cache_dir),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            news_limit: self.news_limit.unwrap_or(defaults.news_limit),
            news_rate_limit: self.news_rate_limit.unwrap_or(defaults.news_rate_limit),
        };

        config.validate()?;
        Ok(config)
    }
}
