//! Embedding, vector index and glossary ingestion for Finance Glossary Copilot
//!
//! This crate provides the local embedder, the persisted vector store, the CSV
//! glossary ingestor and the MMR retriever engine.

mod config;
mod embedder;
mod engine;
mod ingest;
mod vector_store;

pub use config::IndexConfig;
pub use embedder::HashEmbedder;
pub use engine::GlossaryRetriever;
pub use ingest::{GlossaryIngestor, IngestReport, csv_files_in, ensure_index};
pub use vector_store::LocalVectorStore;

// Re-export core types for convenience
pub use fgc_core::{
    Embedder, Error, Result, RetrievalQuery, RetrievalResult, Retriever, SearchConfig,
    SearchResult, Snippet, VectorStore,
};
