//! Glossary retriever implementation

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

use fgc_core::{
    Embedder, RetrievalQuery, RetrievalResult, Result, Retriever, SearchConfig, Snippet,
    VectorStore,
};

/// Retriever over the local snippet index
///
/// Embeds the question, runs MMR search with a plain similarity fallback,
/// then deduplicates hits by content prefix before building the context.
pub struct GlossaryRetriever<V: VectorStore, E: Embedder> {
    store: Arc<V>,
    embedder: Arc<E>,
}

/// Key used for content-based deduplication: the first 160 characters of the
/// trimmed content, case-folded
pub(crate) fn dedup_key(content: &str) -> String {
    content.trim().chars().take(160).collect::<String>().to_lowercase()
}

impl<V: VectorStore, E: Embedder> GlossaryRetriever<V, E> {
    /// Create a new retriever over the given store and embedder
    pub fn new(store: Arc<V>, embedder: Arc<E>) -> Self {
        Self { store, embedder }
    }

    fn dedup(snippets: Vec<Snippet>, top_k: usize) -> Vec<Snippet> {
        let mut seen: HashSet<String> = HashSet::new();
        let mut deduped: Vec<Snippet> = Vec::new();
        for snippet in snippets {
            if seen.insert(dedup_key(&snippet.content)) {
                deduped.push(snippet);
            }
            if deduped.len() == top_k {
                break;
            }
        }
        deduped
    }
}

#[async_trait]
impl<V: VectorStore + 'static, E: Embedder + 'static> Retriever for GlossaryRetriever<V, E> {
    async fn retrieve(&self, query: &RetrievalQuery) -> Result<RetrievalResult> {
        let embedding = self.embedder.embed(&query.query)?;

        let config = SearchConfig {
            top_k: query.top_k,
            fetch_k: query.fetch_k,
            lambda_mult: query.lambda_mult,
            score_threshold: None,
        };

        let search_result = match self.store.mmr_search(&embedding, &config).await {
            Ok(result) => result,
            Err(e) => {
                eprintln!("⚠️  MMR search failed: {}. Falling back to similarity search.", e);
                self.store.similarity_search(&embedding, &config).await?
            }
        };

        let snippets = Self::dedup(search_result.snippets, query.top_k);
        let context = self.build_context(&snippets);

        Ok(RetrievalResult {
            metadata: Some(json!({
                "query": query.query,
                "top_k": query.top_k,
                "results_count": snippets.len(),
            })),
            snippets,
            context,
        })
    }

    fn build_context(&self, snippets: &[Snippet]) -> String {
        snippets
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    async fn stats(&self) -> Result<serde_json::Value> {
        Ok(json!({
            "snippets": self.store.count().await?,
            "embedding_model": self.embedder.model_name(),
            "embedding_dimension": self.embedder.dimension(),
        }))
    }

    fn is_ready(&self) -> bool {
        self.store.is_ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::embedder::HashEmbedder;
    use crate::vector_store::LocalVectorStore;
    use fgc_core::{Error, SearchResult};
    use serde_json::json;
    use tempfile::tempdir;

    fn snippet(embedder: &HashEmbedder, id: &str, content: &str) -> Snippet {
        Snippet {
            id: id.to_string(),
            content: content.to_string(),
            embedding: Some(embedder.embed(content).unwrap()),
            metadata: json!({"row": 0}),
            score: None,
        }
    }

    async fn retriever_with(
        dir: &std::path::Path,
        contents: &[&str],
    ) -> GlossaryRetriever<LocalVectorStore, HashEmbedder> {
        let embedder = Arc::new(HashEmbedder::new());
        let config = IndexConfig::new(dir, "glossary");
        let store = Arc::new(LocalVectorStore::open(&config, embedder.as_ref()).unwrap());

        let snippets: Vec<Snippet> = contents
            .iter()
            .enumerate()
            .map(|(i, content)| snippet(&embedder, &format!("doc{}", i), content))
            .collect();
        if !snippets.is_empty() {
            store.add_batch(snippets).await.unwrap();
        }

        GlossaryRetriever::new(store, embedder)
    }

    #[tokio::test]
    async fn test_known_phrase_is_retrieved() {
        let dir = tempdir().unwrap();
        let retriever = retriever_with(
            dir.path(),
            &[
                "Diversification spreads investment risk across assets.",
                "Inflation is a general rise in prices.",
                "A dividend is a payment to shareholders.",
            ],
        )
        .await;

        let result = retriever
            .retrieve(&RetrievalQuery::new("What is diversification?"))
            .await
            .unwrap();

        assert!(!result.is_empty());
        assert!(result.snippets[0].content.contains("Diversification"));
        assert!(result.context.contains("Diversification"));
    }

    #[tokio::test]
    async fn test_empty_store_retrieves_nothing() {
        let dir = tempdir().unwrap();
        let retriever = retriever_with(dir.path(), &[]).await;

        let result = retriever
            .retrieve(&RetrievalQuery::new("anything"))
            .await
            .unwrap();
        assert!(result.is_empty());
        assert!(result.context.is_empty());
    }

    #[tokio::test]
    async fn test_prefix_duplicates_are_removed() {
        let prefix = "Compound interest is interest earned on both the original \
                      principal and the interest that was previously added to it, \
                      so balances grow faster and faster over longer periods of time";
        assert!(prefix.chars().count() >= 160);

        let first = format!("{} - version one.", prefix);
        let second = format!("{} - VERSION TWO.", prefix.to_uppercase());

        let dir = tempdir().unwrap();
        let retriever = retriever_with(
            dir.path(),
            &[
                first.as_str(),
                second.as_str(),
                "Inflation is a general rise in prices.",
            ],
        )
        .await;

        let result = retriever
            .retrieve(&RetrievalQuery::new("What is compound interest?"))
            .await
            .unwrap();

        let compound_hits = result
            .snippets
            .iter()
            .filter(|s| s.content.to_lowercase().contains("compound interest"))
            .count();
        assert_eq!(compound_hits, 1);
        assert_eq!(result.snippets.len(), 2);
    }

    #[test]
    fn test_dedup_key_is_prefix_and_case_insensitive() {
        let long_a = format!("{}{}", "a".repeat(160), "tail one");
        let long_b = format!("{}{}", "A".repeat(160), "tail two");
        assert_eq!(dedup_key(&long_a), dedup_key(&long_b));

        assert_ne!(dedup_key("short one"), dedup_key("short two"));
        assert_eq!(dedup_key("  padded  "), dedup_key("padded"));
    }

    #[tokio::test]
    async fn test_top_k_is_respected() {
        let contents: Vec<String> = (0..12)
            .map(|i| format!("Glossary entry number {} about markets.", i))
            .collect();
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();

        let dir = tempdir().unwrap();
        let retriever = retriever_with(dir.path(), &refs).await;

        let mut query = RetrievalQuery::new("markets");
        query.top_k = 4;
        let result = retriever.retrieve(&query).await.unwrap();
        assert_eq!(result.snippets.len(), 4);
    }

    /// Store stub whose MMR path always fails, to exercise the fallback
    struct MmrlessStore {
        inner: LocalVectorStore,
    }

    #[async_trait]
    impl VectorStore for MmrlessStore {
        async fn add_batch(&self, snippets: Vec<Snippet>) -> Result<Vec<String>> {
            self.inner.add_batch(snippets).await
        }

        async fn similarity_search(
            &self,
            query: &[f32],
            config: &SearchConfig,
        ) -> Result<SearchResult> {
            self.inner.similarity_search(query, config).await
        }

        async fn mmr_search(&self, _query: &[f32], _config: &SearchConfig) -> Result<SearchResult> {
            Err(Error::VectorStore("mmr unavailable".to_string()))
        }

        async fn get(&self, id: &str) -> Result<Option<Snippet>> {
            self.inner.get(id).await
        }

        async fn clear(&self) -> Result<()> {
            self.inner.clear().await
        }

        async fn count(&self) -> Result<usize> {
            self.inner.count().await
        }

        async fn persist(&self) -> Result<()> {
            self.inner.persist().await
        }

        fn is_ready(&self) -> bool {
            self.inner.is_ready()
        }
    }

    #[tokio::test]
    async fn test_mmr_failure_falls_back_to_similarity() {
        let dir = tempdir().unwrap();
        let embedder = Arc::new(HashEmbedder::new());
        let config = IndexConfig::new(dir.path(), "glossary");
        let store = Arc::new(MmrlessStore {
            inner: LocalVectorStore::open(&config, embedder.as_ref()).unwrap(),
        });

        store
            .add_batch(vec![snippet(
                &embedder,
                "a",
                "Diversification spreads investment risk across assets.",
            )])
            .await
            .unwrap();

        let retriever = GlossaryRetriever::new(store, embedder);
        let result = retriever
            .retrieve(&RetrievalQuery::new("diversification"))
            .await
            .unwrap();

        assert_eq!(result.snippets.len(), 1);
        assert!(result.snippets[0].content.contains("Diversification"));
    }
}
