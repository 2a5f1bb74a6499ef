//! LLM provider trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::Result;

/// Configuration for a chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub model_id: String,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout: Duration,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model_id: "llama3.2".to_string(),
            max_tokens: None,
            temperature: None,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Trait for LLM providers (OpenAI-compatible chat endpoints)
///
/// This trait defines the interface for requesting a grounded answer from
/// a hosted language model.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Check whether the endpoint is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Generate a completion for a single user prompt with default configuration
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate a completion with custom configuration
    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String>;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
