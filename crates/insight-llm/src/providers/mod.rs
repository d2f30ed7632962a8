//! Insight provider implementations

mod anthropic;
mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAIProvider;

use crate::{InsightProvider, ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Named provider implementations available in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Anthropic Claude models
    Anthropic,
    /// OpenAI chat models
    OpenAI,
}

impl Default for ProviderKind {
    fn default() -> Self {
        Self::Anthropic
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anthropic => write!(f, "anthropic"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "anthropic" => Ok(Self::Anthropic),
            "openai" => Ok(Self::OpenAI),
            other => Err(ProviderError::ConfigurationError(format!(
                "Unknown provider: {other}. Supported: anthropic, openai"
            ))),
        }
    }
}

/// Create a provider instance by kind
pub fn create(kind: ProviderKind, api_key: String) -> Result<Arc<dyn InsightProvider>> {
    Ok(match kind {
        ProviderKind::Anthropic => Arc::new(AnthropicProvider::new(api_key)?),
        ProviderKind::OpenAI => Arc::new(OpenAIProvider::new(api_key)?),
    })
}
