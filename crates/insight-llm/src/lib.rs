//! AI-provider abstraction for stock insight generation
//!
//! This crate defines the [`InsightProvider`] trait - a single
//! `generate_insights(prompt) -> text` capability - together with
//! implementations for Anthropic and OpenAI and a small registry of named
//! providers.
//!
//! # Example
//!
//! ```rust,ignore
//! use insight_llm::{ProviderKind, providers};
//!
//! let provider = providers::create(ProviderKind::Anthropic, api_key)?;
//! let insights = provider.generate_insights("Analyze AAPL...").await?;
//! ```

pub mod error;
pub mod provider;
pub mod providers;

pub use error::{ProviderError, Result};
pub use provider::InsightProvider;
pub use providers::{AnthropicProvider, OpenAIProvider, ProviderKind};
