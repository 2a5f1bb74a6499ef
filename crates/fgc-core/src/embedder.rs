//! Embedder trait

use crate::Result;

/// Trait for text embedders
///
/// An embedder turns a text snippet into a fixed-dimension vector suitable
/// for similarity comparison. Implementations must be deterministic: the
/// same text always maps to the same vector for a given model.
pub trait Embedder: Send + Sync {
    /// Embed a single text into a vector
    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed a batch of texts
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Dimension of the produced vectors
    fn dimension(&self) -> usize;

    /// Name of the embedding model
    fn model_name(&self) -> &str;
}
