//! OpenAI-compatible chat client for Finance Glossary Copilot
//!
//! Talks to a locally hosted model server (Ollama by default) over the
//! OpenAI chat-completions API.

mod client;
mod config;

pub use client::OpenAiChatClient;
pub use config::LlmConfig;

// Re-export core types for convenience
pub use fgc_core::{Error, GenerationConfig, LlmProvider, Result};
