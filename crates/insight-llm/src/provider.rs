//! Insight provider trait definition

use crate::Result;
use async_trait::async_trait;

/// Trait for AI insight providers
///
/// Implementations of this trait turn a prepared analysis prompt into
/// free-text insights using a hosted model service (e.g. Anthropic, OpenAI).
#[async_trait]
pub trait InsightProvider: Send + Sync {
    /// Generate insights from the given prompt
    ///
    /// # Arguments
    ///
    /// * `prompt` - The fully assembled analysis prompt
    ///
    /// # Returns
    ///
    /// The model's free-text response
    async fn generate_insights(&self, prompt: &str) -> Result<String>;

    /// Get the provider name (e.g., "anthropic", "openai")
    fn name(&self) -> &str;
}
