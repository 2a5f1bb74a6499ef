//! LLM client configuration

use serde::{Deserialize, Serialize};
use std::env;

use fgc_core::Result;

/// Configuration for the OpenAI-compatible chat client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Base URL of the chat server, e.g. `http://localhost:11434/v1`
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// When false, answers are served straight from retrieval
    pub enabled: bool,
}

impl LlmConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:11434/v1".to_string());
        let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| "ollama".to_string());
        let model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        let enabled = env::var("USE_LLM")
            .map(|v| parse_toggle(&v))
            .unwrap_or(true);

        Ok(Self::new(base_url, api_key, model, enabled))
    }

    /// Create configuration with explicit values
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            enabled,
        }
    }
}

/// Parse a boolean toggle; anything except an explicit off-value counts as on
fn parse_toggle(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_is_normalized() {
        let config = LlmConfig::new("http://localhost:11434/v1/", "ollama", "llama3.2", true);
        assert_eq!(config.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn test_toggle_parsing() {
        assert!(parse_toggle("true"));
        assert!(parse_toggle("1"));
        assert!(parse_toggle("yes"));
        assert!(parse_toggle("anything"));

        assert!(!parse_toggle("0"));
        assert!(!parse_toggle("false"));
        assert!(!parse_toggle("FALSE"));
        assert!(!parse_toggle("no"));
        assert!(!parse_toggle(" off "));
    }
}
