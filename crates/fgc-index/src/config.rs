//! Index configuration

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use fgc_core::Result;

/// Configuration for the snippet index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Directory holding the persisted collection files
    pub index_dir: PathBuf,
    /// Collection name; the store persists to `<index_dir>/<collection>.json`
    pub collection: String,
    /// Embedding model name, e.g. `hash-v1-384`
    pub embedding_model: String,
    /// Directory scanned for glossary CSV files at startup
    pub data_dir: PathBuf,
}

impl IndexConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let index_dir = env::var("INDEX_DIR").unwrap_or_else(|_| "index".to_string());
        let collection = env::var("COLLECTION").unwrap_or_else(|_| "glossary".to_string());
        let embedding_model =
            env::var("EMB_MODEL").unwrap_or_else(|_| "hash-v1-384".to_string());
        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            index_dir: PathBuf::from(index_dir),
            collection,
            embedding_model,
            data_dir: PathBuf::from(data_dir),
        })
    }

    /// Create configuration with explicit values
    pub fn new(index_dir: impl Into<PathBuf>, collection: impl Into<String>) -> Self {
        Self {
            index_dir: index_dir.into(),
            collection: collection.into(),
            embedding_model: "hash-v1-384".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }

    /// Path of the persisted collection file
    pub fn collection_file(&self) -> PathBuf {
        self.index_dir.join(format!("{}.json", self.collection))
    }
}
