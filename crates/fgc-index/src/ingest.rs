//! CSV glossary ingestion

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fgc_core::{Embedder, Error, Result, Snippet, VectorStore};

/// Outcome of an ingestion run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestReport {
    pub files: usize,
    pub rows_read: usize,
    pub indexed: usize,
    pub skipped_empty: usize,
    pub skipped_duplicates: usize,
    pub errors: Vec<String>,
}

/// Reads glossary CSV files and bulk-loads them into the vector store
///
/// Each file needs a `text` column; a `source` column is optional. Rows are
/// trimmed, empty rows dropped, and exact-duplicate texts across all input
/// files are indexed once.
pub struct GlossaryIngestor<V: VectorStore, E: Embedder> {
    store: Arc<V>,
    embedder: Arc<E>,
}

impl<V: VectorStore, E: Embedder> GlossaryIngestor<V, E> {
    /// Create a new ingestor over the given store and embedder
    pub fn new(store: Arc<V>, embedder: Arc<E>) -> Self {
        Self { store, embedder }
    }

    /// Ingest the given CSV files and persist the store
    ///
    /// A file that cannot be read is recorded in the report and skipped; an
    /// ingest that indexes nothing at all is an error.
    pub async fn ingest_files(&self, paths: &[PathBuf]) -> Result<IngestReport> {
        let mut report = IngestReport::default();
        let mut seen: HashSet<String> = HashSet::new();
        let mut snippets: Vec<Snippet> = Vec::new();

        for path in paths {
            println!("📚 Reading {}", path.display());
            report.files += 1;
            if let Err(e) = self.read_file(path, &mut seen, &mut snippets, &mut report) {
                report.errors.push(format!("{}: {}", path.display(), e));
            }
        }

        if snippets.is_empty() {
            return Err(Error::Ingestion(format!(
                "No glossary rows indexed from {} file(s): {}",
                report.files,
                if report.errors.is_empty() {
                    "all rows were empty or duplicates".to_string()
                } else {
                    report.errors.join("; ")
                }
            )));
        }

        report.indexed = snippets.len();
        self.store.add_batch(snippets).await?;
        self.store.persist().await?;

        println!(
            "✅ Indexed {} snippets ({} duplicates, {} empty rows skipped)",
            report.indexed, report.skipped_duplicates, report.skipped_empty
        );
        Ok(report)
    }

    /// Ingest every `*.csv` file found in a directory, in name order
    pub async fn ingest_dir(&self, dir: &Path) -> Result<IngestReport> {
        let files = csv_files_in(dir)?;
        if files.is_empty() {
            return Err(Error::Ingestion(format!(
                "No CSV files found in {}",
                dir.display()
            )));
        }
        self.ingest_files(&files).await
    }

    fn read_file(
        &self,
        path: &Path,
        seen: &mut HashSet<String>,
        snippets: &mut Vec<Snippet>,
        report: &mut IngestReport,
    ) -> Result<()> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Error::Ingestion(e.to_string()))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::Ingestion(e.to_string()))?;
        let text_col = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("text"))
            .ok_or_else(|| Error::Ingestion("missing 'text' column".to_string()))?;
        let source_col = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("source"));

        for record in reader.records() {
            let record = record.map_err(|e| Error::Ingestion(e.to_string()))?;
            report.rows_read += 1;

            let text = record.get(text_col).unwrap_or("").trim().to_string();
            if text.is_empty() {
                report.skipped_empty += 1;
                continue;
            }
            if !seen.insert(text.clone()) {
                report.skipped_duplicates += 1;
                continue;
            }

            let source = source_col
                .and_then(|i| record.get(i))
                .map(str::trim)
                .filter(|s| !s.is_empty());

            let row = snippets.len() as u64;
            let metadata = match source {
                Some(src) => json!({ "row": row, "source": src }),
                None => json!({ "row": row }),
            };

            let embedding = self.embedder.embed(&text)?;
            snippets.push(Snippet {
                id: format!("{:x}", md5::compute(text.as_bytes())),
                content: text,
                embedding: Some(embedding),
                metadata,
                score: None,
            });
        }

        Ok(())
    }
}

/// Build the index at startup when it is empty and data files exist
///
/// Returns the ingest report when a build happened, `None` when the index
/// was already populated or there was nothing to ingest.
pub async fn ensure_index<V: VectorStore, E: Embedder>(
    ingestor: &GlossaryIngestor<V, E>,
    data_dir: &Path,
) -> Result<Option<IngestReport>> {
    if ingestor.store.count().await? > 0 {
        return Ok(None);
    }

    let files = csv_files_in(data_dir)?;
    if files.is_empty() {
        println!(
            "ℹ️  No data files found in {}. Starting with an empty index.",
            data_dir.display()
        );
        return Ok(None);
    }

    let report = ingestor.ingest_files(&files).await?;
    Ok(Some(report))
}

/// All `*.csv` files directly inside a directory, in name order
///
/// A missing or non-directory path yields an empty list.
pub fn csv_files_in(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::embedder::HashEmbedder;
    use crate::vector_store::LocalVectorStore;
    use fgc_core::SearchConfig;
    use std::fs;
    use tempfile::tempdir;

    fn setup(
        dir: &Path,
    ) -> (
        Arc<LocalVectorStore>,
        Arc<HashEmbedder>,
        GlossaryIngestor<LocalVectorStore, HashEmbedder>,
    ) {
        let embedder = Arc::new(HashEmbedder::new());
        let config = IndexConfig::new(dir.join("index"), "glossary");
        let store = Arc::new(LocalVectorStore::open(&config, embedder.as_ref()).unwrap());
        let ingestor = GlossaryIngestor::new(store.clone(), embedder.clone());
        (store, embedder, ingestor)
    }

    #[tokio::test]
    async fn test_ingest_builds_queryable_index() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("glossary.csv");
        fs::write(
            &csv_path,
            "text,source\n\
             Diversification spreads investment risk across assets.,notes\n\
             Inflation is a general rise in prices.,web\n",
        )
        .unwrap();

        let (store, embedder, ingestor) = setup(dir.path());
        let report = ingestor.ingest_files(&[csv_path]).await.unwrap();

        assert_eq!(report.rows_read, 2);
        assert_eq!(report.indexed, 2);
        assert!(report.errors.is_empty());
        assert_eq!(store.count().await.unwrap(), 2);

        let query = embedder.embed("What is diversification?").unwrap();
        let result = store
            .similarity_search(&query, &SearchConfig::default())
            .await
            .unwrap();
        assert!(result.snippets[0].content.contains("Diversification"));
        assert_eq!(result.snippets[0].row(), Some(0));
        assert_eq!(result.snippets[0].source(), Some("notes"));
    }

    #[tokio::test]
    async fn test_ingest_skips_empty_and_duplicate_rows() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("glossary.csv");
        fs::write(
            &csv_path,
            "text\nA bond pays fixed interest.\n\"\"\n  A bond pays fixed interest.  \nEquity is ownership.\n",
        )
        .unwrap();

        let (store, _embedder, ingestor) = setup(dir.path());
        let report = ingestor.ingest_files(&[csv_path]).await.unwrap();

        assert_eq!(report.indexed, 2);
        assert_eq!(report.skipped_empty, 1);
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_ingest_deduplicates_across_files() {
        let dir = tempdir().unwrap();
        let first = dir.path().join("a.csv");
        let second = dir.path().join("b.csv");
        fs::write(&first, "text\nLiquidity is ease of selling.\n").unwrap();
        fs::write(
            &second,
            "text\nLiquidity is ease of selling.\nA dividend is a payout.\n",
        )
        .unwrap();

        let (store, _embedder, ingestor) = setup(dir.path());
        let report = ingestor.ingest_files(&[first, second]).await.unwrap();

        assert_eq!(report.indexed, 2);
        assert_eq!(report.skipped_duplicates, 1);
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_text_column_is_an_error() {
        let dir = tempdir().unwrap();
        let csv_path = dir.path().join("bad.csv");
        fs::write(&csv_path, "phrase\nhello\n").unwrap();

        let (_store, _embedder, ingestor) = setup(dir.path());
        let err = ingestor.ingest_files(&[csv_path]).await.unwrap_err();
        assert!(err.to_string().contains("text"));
    }

    #[tokio::test]
    async fn test_bad_file_recorded_but_other_files_indexed() {
        let dir = tempdir().unwrap();
        let bad = dir.path().join("bad.csv");
        let good = dir.path().join("good.csv");
        fs::write(&bad, "phrase\nhello\n").unwrap();
        fs::write(&good, "text\nEquity is ownership in a company.\n").unwrap();

        let (store, _embedder, ingestor) = setup(dir.path());
        let report = ingestor.ingest_files(&[bad, good]).await.unwrap();

        assert_eq!(report.indexed, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_ensure_index_builds_once() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("data");
        fs::create_dir_all(&data_dir).unwrap();
        fs::write(
            data_dir.join("glossary.csv"),
            "text\nInflation is a general rise in prices.\n",
        )
        .unwrap();

        let (store, _embedder, ingestor) = setup(dir.path());

        let first = ensure_index(&ingestor, &data_dir).await.unwrap();
        assert!(first.is_some());
        assert_eq!(store.count().await.unwrap(), 1);

        let second = ensure_index(&ingestor, &data_dir).await.unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn test_ensure_index_without_data_dir_is_noop() {
        let dir = tempdir().unwrap();
        let (store, _embedder, ingestor) = setup(dir.path());

        let report = ensure_index(&ingestor, &dir.path().join("missing"))
            .await
            .unwrap();
        assert!(report.is_none());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
