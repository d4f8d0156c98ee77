//! Vector store abstraction.
//!
//! Embedding records for uploaded-document chunks live behind the
//! [`VectorStore`] trait so the backend can be swapped:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  VectorStore Trait                   │
//! ├──────────────────────────────────────────────────────┤
//! │ upsert │ search │ delete_by_document │ chunks │ count│
//! └──────────────────────────────────────────────────────┘
//!          ▲                                  ▲
//!          │                                  │
//!   ┌──────┴────────┐                 ┌───────┴───────┐
//!   │ EmbeddedStore │                 │    Qdrant     │
//!   │   (default)   │                 │  (feature)    │
//!   └───────────────┘                 └───────────────┘
//! ```
//!
//! The embedded store keeps records in memory with optional JSON persistence;
//! at single-user scale, exact cosine scan is accurate and fast enough.

use crate::types::{AppError, EmbeddingRecord, Result, ScoredChunk};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::PathBuf;

/// Abstract trait for embedding storage and similarity search.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Name of this vector store backend.
    fn provider_name(&self) -> &'static str;

    /// Upsert embedding records, keyed by their `id`. Returns the number of
    /// records written.
    async fn upsert(&self, records: &[EmbeddingRecord]) -> Result<usize>;

    /// Cosine similarity search, descending score. `document_id` restricts
    /// results to one document's chunks.
    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
        document_id: Option<&str>,
    ) -> Result<Vec<ScoredChunk>>;

    /// Delete every record belonging to a document. Returns the number
    /// removed.
    async fn delete_by_document(&self, document_id: &str) -> Result<usize>;

    /// All chunks of a document, ordered by chunk index.
    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<ScoredChunk>>;

    /// Total number of stored records.
    async fn count(&self) -> Result<usize>;
}

// ============================================================================
// Embedded Vector Store
// ============================================================================

/// In-process cosine vector store with optional JSON persistence.
pub struct EmbeddedVectorStore {
    records: RwLock<HashMap<String, EmbeddingRecord>>,
    dimensions: usize,
    path: Option<PathBuf>,
}

impl EmbeddedVectorStore {
    /// Create a store. With `Some(path)`, existing records are loaded from
    /// `<path>/records.json` and every mutation is flushed back.
    pub async fn new(path: Option<String>, dimensions: usize) -> Result<Self> {
        let path = path.filter(|p| !p.is_empty()).map(PathBuf::from);

        let store = Self {
            records: RwLock::new(HashMap::new()),
            dimensions,
            path,
        };

        if let Some(ref dir) = store.path {
            store.load(dir.clone()).await?;
        }

        Ok(store)
    }

    async fn load(&self, dir: PathBuf) -> Result<()> {
        let file = dir.join("records.json");
        if !file.exists() {
            return Ok(());
        }

        let data = tokio::fs::read_to_string(&file)
            .await
            .map_err(|e| AppError::Database(format!("Failed to read vector store: {}", e)))?;

        let loaded: HashMap<String, EmbeddingRecord> = serde_json::from_str(&data)
            .map_err(|e| AppError::Database(format!("Failed to parse vector store: {}", e)))?;

        tracing::info!("Loaded {} embedding records from disk", loaded.len());
        *self.records.write() = loaded;
        Ok(())
    }

    async fn save(&self) -> Result<()> {
        let Some(ref dir) = self.path else {
            return Ok(());
        };

        // Serialize outside the lock guard so it is not held across awaits
        let data = {
            let records = self.records.read();
            serde_json::to_string(&*records)
                .map_err(|e| AppError::Internal(format!("Failed to serialize vectors: {}", e)))?
        };

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create vector dir: {}", e)))?;

        tokio::fs::write(dir.join("records.json"), data)
            .await
            .map_err(|e| AppError::Database(format!("Failed to write vector store: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl VectorStore for EmbeddedVectorStore {
    fn provider_name(&self) -> &'static str {
        "embedded"
    }

    async fn upsert(&self, records: &[EmbeddingRecord]) -> Result<usize> {
        for record in records {
            if record.vector.len() != self.dimensions {
                return Err(AppError::InvalidInput(format!(
                    "Vector dimension mismatch: expected {}, got {}",
                    self.dimensions,
                    record.vector.len()
                )));
            }
        }

        {
            let mut store = self.records.write();
            for record in records {
                store.insert(record.id.clone(), record.clone());
            }
        }

        self.save().await?;
        Ok(records.len())
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
        document_id: Option<&str>,
    ) -> Result<Vec<ScoredChunk>> {
        let mut scored: Vec<ScoredChunk> = {
            let records = self.records.read();
            records
                .values()
                .filter(|r| document_id.map_or(true, |id| r.document_id == id))
                .map(|r| ScoredChunk {
                    id: r.id.clone(),
                    document_id: r.document_id.clone(),
                    chunk_index: r.chunk_index,
                    text: r.text.clone(),
                    file_name: r.file_name.clone(),
                    score: cosine_similarity(embedding, &r.vector),
                })
                .filter(|c| c.score >= threshold)
                .collect()
        };

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit);
        Ok(scored)
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<usize> {
        let removed = {
            let mut records = self.records.write();
            let before = records.len();
            records.retain(|_, r| r.document_id != document_id);
            before - records.len()
        };

        self.save().await?;
        Ok(removed)
    }

    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<ScoredChunk>> {
        let mut chunks: Vec<ScoredChunk> = {
            let records = self.records.read();
            records
                .values()
                .filter(|r| r.document_id == document_id)
                .map(|r| ScoredChunk {
                    id: r.id.clone(),
                    document_id: r.document_id.clone(),
                    chunk_index: r.chunk_index,
                    text: r.text.clone(),
                    file_name: r.file_name.clone(),
                    score: 1.0,
                })
                .collect()
        };

        chunks.sort_by_key(|c| c.chunk_index);
        Ok(chunks)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

/// Cosine similarity between two vectors; 0.0 for mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(id: &str, document_id: &str, chunk_index: usize, vector: Vec<f32>) -> EmbeddingRecord {
        EmbeddingRecord {
            id: id.to_string(),
            document_id: document_id.to_string(),
            chunk_index,
            text: format!("chunk {}", chunk_index),
            vector,
            file_name: "paper.pdf".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn cosine_of_identical_vectors_is_one() {
        let v = vec![0.3, 0.5, 0.1];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_of_orthogonal_vectors_is_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn cosine_handles_mismatched_and_zero_vectors() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[tokio::test]
    async fn search_returns_descending_scores_with_limit() {
        let store = EmbeddedVectorStore::new(None, 2).await.unwrap();
        store
            .upsert(&[
                record("a", "doc1", 0, vec![1.0, 0.0]),
                record("b", "doc1", 1, vec![0.7, 0.7]),
                record("c", "doc2", 0, vec![0.0, 1.0]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2, 0.0, None).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].score >= results[1].score);
        assert_eq!(results[0].id, "a");
    }

    #[tokio::test]
    async fn search_respects_threshold_and_document_filter() {
        let store = EmbeddedVectorStore::new(None, 2).await.unwrap();
        store
            .upsert(&[
                record("a", "doc1", 0, vec![1.0, 0.0]),
                record("b", "doc2", 0, vec![0.9, 0.1]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 10, 0.99, None).await.unwrap();
        assert_eq!(results.len(), 2 - 1); // doc2's vector scores below 0.99

        let filtered = store
            .search(&[1.0, 0.0], 10, 0.0, Some("doc2"))
            .await
            .unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].document_id, "doc2");
    }

    #[tokio::test]
    async fn delete_by_document_removes_all_chunks() {
        let store = EmbeddedVectorStore::new(None, 2).await.unwrap();
        store
            .upsert(&[
                record("a", "doc1", 0, vec![1.0, 0.0]),
                record("b", "doc1", 1, vec![0.0, 1.0]),
                record("c", "doc2", 0, vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let removed = store.delete_by_document("doc1").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.chunks_for_document("doc1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chunks_are_ordered_by_index() {
        let store = EmbeddedVectorStore::new(None, 2).await.unwrap();
        store
            .upsert(&[
                record("b", "doc1", 1, vec![0.0, 1.0]),
                record("a", "doc1", 0, vec![1.0, 0.0]),
                record("c", "doc1", 2, vec![1.0, 1.0]),
            ])
            .await
            .unwrap();

        let chunks = store.chunks_for_document("doc1").await.unwrap();
        let indices: Vec<usize> = chunks.iter().map(|c| c.chunk_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn dimension_mismatch_is_rejected() {
        let store = EmbeddedVectorStore::new(None, 3).await.unwrap();
        let result = store.upsert(&[record("a", "doc1", 0, vec![1.0, 0.0])]).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn persistence_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();

        {
            let store = EmbeddedVectorStore::new(Some(path.clone()), 2).await.unwrap();
            store
                .upsert(&[record("a", "doc1", 0, vec![1.0, 0.0])])
                .await
                .unwrap();
        }

        let reloaded = EmbeddedVectorStore::new(Some(path), 2).await.unwrap();
        assert_eq!(reloaded.count().await.unwrap(), 1);
    }
}
