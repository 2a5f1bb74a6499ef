//! Retriever trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, Snippet};

/// Query for snippet retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalQuery {
    pub query: String,
    pub top_k: usize,
    pub fetch_k: usize,
    pub lambda_mult: f32,
}

impl RetrievalQuery {
    /// Query with the default retrieval parameters
    pub fn new(query: impl Into<String>) -> Self {
        let top_k = 5;
        Self {
            query: query.into(),
            top_k,
            fetch_k: std::cmp::max(top_k * 3, 20),
            lambda_mult: 0.4,
        }
    }
}

impl Default for RetrievalQuery {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Result from snippet retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub snippets: Vec<Snippet>,
    pub context: String,
    pub metadata: Option<serde_json::Value>,
}

impl RetrievalResult {
    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }
}

/// Trait for retrievers
///
/// A retriever answers "which snippets are relevant to this question" and
/// turns the hits into a context block for prompting.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Retrieve relevant snippets for a query
    async fn retrieve(&self, query: &RetrievalQuery) -> Result<RetrievalResult>;

    /// Build a context block from retrieved snippets
    fn build_context(&self, snippets: &[Snippet]) -> String;

    /// Get statistics about the retriever
    async fn stats(&self) -> Result<serde_json::Value>;

    /// Check if the retriever is ready
    fn is_ready(&self) -> bool;
}
