//! Vector store trait and types

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::Result;

/// A glossary snippet stored in the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub id: String,
    pub content: String,
    pub embedding: Option<Vec<f32>>,
    pub metadata: serde_json::Value,
    pub score: Option<f32>,
}

impl Snippet {
    /// Row number attached at ingestion time, if any
    pub fn row(&self) -> Option<u64> {
        self.metadata.get("row").and_then(|v| v.as_u64())
    }

    /// Source label attached at ingestion time, if any
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }
}

/// Search result from the vector store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub snippets: Vec<Snippet>,
    pub total: usize,
}

/// Configuration for vector search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub top_k: usize,
    /// Candidate pool size for MMR re-ranking
    pub fetch_k: usize,
    /// MMR relevance/diversity balance: 1.0 = pure relevance, 0.0 = pure diversity
    pub lambda_mult: f32,
    pub score_threshold: Option<f32>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let top_k = 5;
        Self {
            top_k,
            fetch_k: std::cmp::max(top_k * 3, 20),
            lambda_mult: 0.4,
            score_threshold: None,
        }
    }
}

impl SearchConfig {
    /// Config for the given `top_k` with the default candidate pool rule
    pub fn with_top_k(top_k: usize) -> Self {
        Self {
            top_k,
            fetch_k: std::cmp::max(top_k * 3, 20),
            ..Default::default()
        }
    }
}

/// Trait for vector stores
///
/// This trait defines the interface for the persisted snippet index.
/// It supports bulk insertion, cosine similarity search, and
/// maximal-marginal-relevance search over a query embedding.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Store a batch of snippets, replacing any existing snippet with the same id
    async fn add_batch(&self, snippets: Vec<Snippet>) -> Result<Vec<String>>;

    /// Search for the snippets most similar to the query embedding
    async fn similarity_search(&self, query: &[f32], config: &SearchConfig) -> Result<SearchResult>;

    /// Maximal-marginal-relevance search: relevance to the query balanced
    /// against diversity among the selected snippets
    async fn mmr_search(&self, query: &[f32], config: &SearchConfig) -> Result<SearchResult>;

    /// Get a snippet by id
    async fn get(&self, id: &str) -> Result<Option<Snippet>>;

    /// Clear all snippets from the store
    async fn clear(&self) -> Result<()>;

    /// Total number of stored snippets
    async fn count(&self) -> Result<usize>;

    /// Write the current contents to disk
    async fn persist(&self) -> Result<()>;

    /// Check if the store is ready for queries
    fn is_ready(&self) -> bool;
}
