//! Local feature-hashed embedder

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use fgc_core::{Embedder, Error, Result};

const MODEL_PREFIX: &str = "hash-v1-";

/// Deterministic feature-hashing embedder
///
/// Maps lowercased word unigrams to three hashed feature indices with
/// positional weighting, adds bigram features, and L2-normalizes the result.
/// Runs fully offline, which keeps index builds and queries dependency-free.
pub struct HashEmbedder {
    model_name: String,
    dimension: usize,
}

impl HashEmbedder {
    /// Create an embedder with the default 384-dimension model
    pub fn new() -> Self {
        Self::with_dimension(384)
    }

    /// Create an embedder with an explicit dimension
    pub fn with_dimension(dimension: usize) -> Self {
        Self {
            model_name: format!("{}{}", MODEL_PREFIX, dimension),
            dimension,
        }
    }

    /// Resolve an embedder from a model name such as `hash-v1-384`
    pub fn from_model_name(name: &str) -> Result<Self> {
        let dimension = name
            .strip_prefix(MODEL_PREFIX)
            .and_then(|d| d.parse::<usize>().ok())
            .filter(|d| *d > 0)
            .ok_or_else(|| {
                Error::Configuration(format!(
                    "Unknown embedding model '{}' (expected '{}<dimension>')",
                    name, MODEL_PREFIX
                ))
            })?;
        Ok(Self::with_dimension(dimension))
    }

    fn hash_of(text: &str) -> u64 {
        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for HashEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl Embedder for HashEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let normalized_text = text.to_lowercase();
        let words: Vec<&str> = normalized_text
            .split_whitespace()
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| !w.is_empty())
            .collect();

        let mut embedding = vec![0.0; self.dimension];

        // Word features at three hashed indices, earlier words weighted higher
        for (pos, word) in words.iter().enumerate() {
            let hash = Self::hash_of(word);

            let idx1 = (hash % self.dimension as u64) as usize;
            let idx2 = ((hash >> 16) % self.dimension as u64) as usize;
            let idx3 = ((hash >> 32) % self.dimension as u64) as usize;

            let position_weight = 1.0 / (pos as f32 + 1.0);

            embedding[idx1] += position_weight;
            embedding[idx2] += position_weight * 0.7;
            embedding[idx3] += position_weight * 0.5;
        }

        // Bigram features
        for i in 0..words.len().saturating_sub(1) {
            let bigram = format!("{} {}", words[i], words[i + 1]);
            let idx = (Self::hash_of(&bigram) % self.dimension as u64) as usize;
            embedding[idx] += 0.8;
        }

        // L2 normalization
        let magnitude: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if magnitude > 0.0 {
            for val in embedding.iter_mut() {
                *val /= magnitude;
            }
        }

        Ok(embedding)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

/// Cosine similarity between two vectors
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let magnitude_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}
