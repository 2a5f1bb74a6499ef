//! OpenAI-compatible chat client implementation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use fgc_core::{Error, GenerationConfig, LlmProvider, Result};

use crate::config::LlmConfig;

/// Chat client against an OpenAI-compatible endpoint (Ollama, LM Studio, ...)
pub struct OpenAiChatClient {
    config: LlmConfig,
    client: Client,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

impl OpenAiChatClient {
    /// Create a new client from configuration
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = LlmConfig::from_env()?;
        Self::new(config)
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url)
    }

    async fn perform_chat(&self, prompt: &str, config: &GenerationConfig) -> Result<String> {
        let request_body = ChatRequest {
            model: config.model_id.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        let response = self
            .client
            .post(self.chat_url())
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::LlmProvider(format!(
                "Chat request failed with status {}: {}",
                status, error_text
            )));
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Serialization(e.to_string()))?;

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                Error::LlmProvider("Chat response contained no message content".to_string())
            })?;

        Ok(content)
    }
}

#[async_trait]
impl LlmProvider for OpenAiChatClient {
    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.models_url())
            .bearer_auth(&self.config.api_key)
            .send()
            .await;

        match response {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let config = GenerationConfig {
            model_id: self.config.model.clone(),
            ..Default::default()
        };
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String> {
        let chat_future = self.perform_chat(prompt, config);

        match timeout(config.timeout, chat_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "Chat request to {} timed out",
                self.config.model
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}
