//! Core traits and types for FGC (Finance Glossary Copilot)
//!
//! This crate defines the fundamental traits and types used across the FGC system.
//! It provides capability-facing interfaces for embedders, vector stores, retrievers,
//! and LLM providers, making the system test-friendly and extensible.

pub mod embedder;
pub mod error;
pub mod llm;
pub mod retriever;
pub mod types;
pub mod vector_store;

pub use embedder::Embedder;
pub use error::{Error, Result};
pub use llm::{GenerationConfig, LlmProvider};
pub use retriever::{RetrievalQuery, RetrievalResult, Retriever};
pub use types::{Answer, AnswerStyle, NOT_FOUND_ANSWER};
pub use vector_store::{SearchConfig, SearchResult, Snippet, VectorStore};
