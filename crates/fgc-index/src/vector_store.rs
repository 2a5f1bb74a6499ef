//! Persisted local vector store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use async_trait::async_trait;
use fgc_core::{Embedder, Error, Result, SearchConfig, SearchResult, Snippet, VectorStore};

use crate::config::IndexConfig;
use crate::embedder::cosine_similarity;

/// A snippet as persisted on disk; the embedding is always present here
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredSnippet {
    id: String,
    content: String,
    metadata: serde_json::Value,
    embedding: Vec<f32>,
}

/// On-disk layout of a collection file
#[derive(Debug, Serialize, Deserialize)]
struct CollectionData {
    embedding_model: String,
    embedding_dimension: usize,
    built_at: DateTime<Utc>,
    snippets: Vec<StoredSnippet>,
}

/// Local vector store persisting one JSON file per collection
///
/// Snippets are held in memory behind a read lock; queries are served from
/// memory and `persist` writes the whole collection back to
/// `<index_dir>/<collection>.json`.
#[derive(Debug)]
pub struct LocalVectorStore {
    collection_file: PathBuf,
    embedding_model: String,
    embedding_dimension: usize,
    snippets: RwLock<Vec<StoredSnippet>>,
}

impl LocalVectorStore {
    /// Open the collection for the given config, loading any persisted data
    pub fn open(config: &IndexConfig, embedder: &dyn Embedder) -> Result<Self> {
        let collection_file = config.collection_file();

        let snippets = if collection_file.exists() {
            let data = Self::load_from_file(&collection_file)?;
            if data.embedding_model != embedder.model_name()
                || data.embedding_dimension != embedder.dimension()
            {
                return Err(Error::Configuration(format!(
                    "Collection '{}' was built with embedding model '{}' ({} dims), \
                     but '{}' ({} dims) is configured. Rebuild the index.",
                    config.collection,
                    data.embedding_model,
                    data.embedding_dimension,
                    embedder.model_name(),
                    embedder.dimension(),
                )));
            }
            data.snippets
        } else {
            Vec::new()
        };

        Ok(Self {
            collection_file,
            embedding_model: embedder.model_name().to_string(),
            embedding_dimension: embedder.dimension(),
            snippets: RwLock::new(snippets),
        })
    }

    fn load_from_file(path: &PathBuf) -> Result<CollectionData> {
        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| Error::Serialization(format!("Invalid collection file: {}", e)))
    }

    /// Top `fetch_k` snippets by cosine score, best first
    fn scored_candidates(&self, query: &[f32], fetch_k: usize) -> Vec<(f32, StoredSnippet)> {
        let snippets = self.snippets.read().expect("store lock poisoned");

        let mut scored: Vec<(f32, StoredSnippet)> = snippets
            .iter()
            .map(|doc| (cosine_similarity(query, &doc.embedding), doc.clone()))
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(fetch_k);
        scored
    }

    fn to_result_snippet(score: f32, doc: StoredSnippet) -> Snippet {
        Snippet {
            id: doc.id,
            content: doc.content,
            embedding: None,
            metadata: doc.metadata,
            score: Some(score),
        }
    }
}

#[async_trait]
impl VectorStore for LocalVectorStore {
    async fn add_batch(&self, snippets: Vec<Snippet>) -> Result<Vec<String>> {
        let mut stored = Vec::with_capacity(snippets.len());
        for snippet in snippets {
            let embedding = snippet.embedding.ok_or_else(|| {
                Error::VectorStore(format!("Snippet '{}' has no embedding", snippet.id))
            })?;
            if embedding.len() != self.embedding_dimension {
                return Err(Error::VectorStore(format!(
                    "Snippet '{}' embedding has {} dims, store expects {}",
                    snippet.id,
                    embedding.len(),
                    self.embedding_dimension
                )));
            }
            stored.push(StoredSnippet {
                id: snippet.id,
                content: snippet.content,
                metadata: snippet.metadata,
                embedding,
            });
        }

        let mut existing = self.snippets.write().expect("store lock poisoned");
        let mut ids = Vec::with_capacity(stored.len());
        for doc in stored {
            // Last write wins on duplicate ids
            existing.retain(|d| d.id != doc.id);
            ids.push(doc.id.clone());
            existing.push(doc);
        }

        Ok(ids)
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        config: &SearchConfig,
    ) -> Result<SearchResult> {
        let mut snippets: Vec<Snippet> = self
            .scored_candidates(query, config.top_k)
            .into_iter()
            .map(|(score, doc)| Self::to_result_snippet(score, doc))
            .collect();

        if let Some(threshold) = config.score_threshold {
            snippets.retain(|s| s.score.unwrap_or(0.0) >= threshold);
        }

        let total = snippets.len();
        Ok(SearchResult { snippets, total })
    }

    async fn mmr_search(&self, query: &[f32], config: &SearchConfig) -> Result<SearchResult> {
        let fetch_k = std::cmp::max(config.fetch_k, config.top_k);
        let mut candidates = self.scored_candidates(query, fetch_k);

        if let Some(threshold) = config.score_threshold {
            candidates.retain(|(score, _)| *score >= threshold);
        }

        let lambda = config.lambda_mult;
        let mut selected: Vec<(f32, StoredSnippet)> = Vec::new();

        // Greedy MMR: relevance to the query traded against the maximum
        // similarity to anything already selected
        while selected.len() < config.top_k && !candidates.is_empty() {
            let mut best_idx = 0;
            let mut best_score = f32::NEG_INFINITY;

            for (idx, (relevance, doc)) in candidates.iter().enumerate() {
                let max_selected_sim = selected
                    .iter()
                    .map(|(_, chosen)| cosine_similarity(&doc.embedding, &chosen.embedding))
                    .fold(0.0_f32, f32::max);

                let mmr = lambda * relevance - (1.0 - lambda) * max_selected_sim;
                if mmr > best_score {
                    best_score = mmr;
                    best_idx = idx;
                }
            }

            selected.push(candidates.remove(best_idx));
        }

        let snippets: Vec<Snippet> = selected
            .into_iter()
            .map(|(score, doc)| Self::to_result_snippet(score, doc))
            .collect();

        let total = snippets.len();
        Ok(SearchResult { snippets, total })
    }

    async fn get(&self, id: &str) -> Result<Option<Snippet>> {
        let snippets = self.snippets.read().expect("store lock poisoned");
        Ok(snippets.iter().find(|doc| doc.id == id).map(|doc| Snippet {
            id: doc.id.clone(),
            content: doc.content.clone(),
            embedding: None,
            metadata: doc.metadata.clone(),
            score: None,
        }))
    }

    async fn clear(&self) -> Result<()> {
        self.snippets.write().expect("store lock poisoned").clear();
        Ok(())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.snippets.read().expect("store lock poisoned").len())
    }

    async fn persist(&self) -> Result<()> {
        let data = {
            let snippets = self.snippets.read().expect("store lock poisoned");
            CollectionData {
                embedding_model: self.embedding_model.clone(),
                embedding_dimension: self.embedding_dimension,
                built_at: Utc::now(),
                snippets: snippets.clone(),
            }
        };

        if let Some(parent) = self.collection_file.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&data)
            .map_err(|e| Error::Serialization(e.to_string()))?;
        fs::write(&self.collection_file, content)?;
        Ok(())
    }

    fn is_ready(&self) -> bool {
        true
    }
}
