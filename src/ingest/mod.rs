//! Document ingestion pipeline.
//!
//! Upload bytes flow through: validate -> persist file -> create record
//! (pending) -> processing -> extract text -> chunk -> embed -> upsert
//! vectors -> done. Any failing step marks the document `failed` with the
//! error message; a `done` document always has at least one embedding record.
//!
//! Deletion cascades in the reverse order: vectors first, then the stored
//! file, then the database row, so a crash mid-delete never leaves vectors
//! pointing at a missing document.

pub mod extract;

use crate::db::{StoreClient, VectorStore};
use crate::rag::{Embedder, TextChunker};
use crate::types::{
    AppError, DocumentRecord, DocumentStatus, EmbeddingRecord, Result,
};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Outcome of a completed ingestion.
pub struct IngestOutcome {
    pub document_id: String,
    pub chunk_count: usize,
}

/// Orchestrates upload processing against the stores.
pub struct DocumentPipeline {
    store: Arc<StoreClient>,
    vectors: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
    chunker: TextChunker,
    upload_dir: PathBuf,
    max_upload_bytes: usize,
    user_id: String,
}

impl DocumentPipeline {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<StoreClient>,
        vectors: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        chunker: TextChunker,
        upload_dir: impl Into<PathBuf>,
        max_upload_bytes: usize,
        user_id: String,
    ) -> Self {
        Self {
            store,
            vectors,
            embedder,
            chunker,
            upload_dir: upload_dir.into(),
            max_upload_bytes,
            user_id,
        }
    }

    /// Ingest an uploaded file end to end.
    pub async fn ingest(&self, file_name: &str, bytes: &[u8]) -> Result<IngestOutcome> {
        if file_name.is_empty() {
            return Err(AppError::InvalidInput("No file provided".to_string()));
        }
        if bytes.is_empty() {
            return Err(AppError::InvalidInput("Empty file".to_string()));
        }
        if bytes.len() > self.max_upload_bytes {
            return Err(AppError::InvalidInput(format!(
                "File size exceeds maximum allowed size of {}MB",
                self.max_upload_bytes / (1024 * 1024)
            )));
        }

        let file_type = extract::file_type(file_name).ok_or_else(|| {
            AppError::InvalidInput(
                "Unsupported file format. Supported formats: PDF, TXT, MD".to_string(),
            )
        })?;

        let document_id = Uuid::new_v4().to_string();
        let extension = Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("bin");
        let file_path = self.upload_dir.join(format!("{}.{}", document_id, extension));

        tokio::fs::create_dir_all(&self.upload_dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;
        tokio::fs::write(&file_path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to store upload: {}", e)))?;

        tracing::info!("File uploaded: {} -> {}", file_name, file_path.display());

        let record = DocumentRecord {
            id: document_id.clone(),
            user_id: self.user_id.clone(),
            file_name: file_name.to_string(),
            file_path: file_path.to_string_lossy().to_string(),
            file_type: file_type.as_str().to_string(),
            file_size_bytes: bytes.len() as i64,
            extraction_method: String::new(),
            status: DocumentStatus::Pending,
            chunk_count: 0,
            error: None,
            created_at: Utc::now(),
        };
        self.store.create_document(&record).await?;

        match self.process(&document_id, file_name, file_type, bytes).await {
            Ok(chunk_count) => {
                tracing::info!("Document processed successfully: {}", document_id);
                Ok(IngestOutcome {
                    document_id,
                    chunk_count,
                })
            }
            Err(error) => {
                tracing::error!("Failed to process document {}: {}", document_id, error);
                self.store
                    .fail_document(&document_id, &error.to_string())
                    .await?;
                Err(error)
            }
        }
    }

    async fn process(
        &self,
        document_id: &str,
        file_name: &str,
        file_type: extract::FileType,
        bytes: &[u8],
    ) -> Result<usize> {
        self.store
            .set_document_status(document_id, DocumentStatus::Processing)
            .await?;

        let content = extract::extract_text(bytes, file_type)?;
        let chunks = self.chunker.chunk(&content);
        if chunks.is_empty() {
            return Err(AppError::InvalidInput(
                "Document contains no extractable text".to_string(),
            ));
        }

        let vectors = self.embedder.embed(chunks.clone())?;

        let now = Utc::now();
        let records: Vec<EmbeddingRecord> = chunks
            .into_iter()
            .zip(vectors)
            .enumerate()
            .map(|(index, (text, vector))| EmbeddingRecord {
                id: format!("{}_chunk_{}", document_id, index),
                document_id: document_id.to_string(),
                chunk_index: index,
                text,
                vector,
                file_name: file_name.to_string(),
                created_at: now,
            })
            .collect();

        let chunk_count = records.len();
        self.vectors.upsert(&records).await?;

        self.store
            .finish_document(document_id, chunk_count, file_type.extraction_method())
            .await?;

        tracing::info!("Stored {} chunks for document: {}", chunk_count, document_id);
        Ok(chunk_count)
    }

    /// Delete a document: vectors, then file, then row.
    pub async fn delete(&self, document_id: &str) -> Result<()> {
        let document = self
            .store
            .get_document(document_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Document not found: {}", document_id)))?;

        self.vectors.delete_by_document(document_id).await?;

        let path = Path::new(&document.file_path);
        if path.exists() {
            tokio::fs::remove_file(path)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to remove file: {}", e)))?;
        }

        self.store.delete_document(document_id).await?;

        tracing::info!("Document deleted: {}", document_id);
        Ok(())
    }
}
