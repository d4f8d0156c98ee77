use crate::types::{AppError, EmbeddingRecord, Result, ScoredChunk};
use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        Condition, CountPointsBuilder, CreateCollectionBuilder, DeletePointsBuilder, Distance,
        Filter, PointStruct, ScrollPointsBuilder, SearchPointsBuilder, UpsertPointsBuilder,
        VectorParamsBuilder,
    },
    Qdrant,
};
use std::collections::HashMap;
use uuid::Uuid;

use super::vectorstore::VectorStore;

const COLLECTION: &str = "research_documents";

/// Qdrant-backed vector store.
///
/// Requires a running Qdrant server. Qdrant point IDs must be UUIDs, so the
/// record id (`<document>_chunk_<n>`) maps to a deterministic v5 UUID and the
/// original id rides along in the payload.
pub struct QdrantVectorStore {
    client: Qdrant,
}

impl QdrantVectorStore {
    pub async fn new(url: String, api_key: Option<String>, dimensions: usize) -> Result<Self> {
        let client = if let Some(key) = api_key {
            Qdrant::from_url(&url)
                .api_key(key)
                .build()
                .map_err(|e| AppError::Database(format!("Failed to create Qdrant client: {}", e)))?
        } else {
            Qdrant::from_url(&url)
                .build()
                .map_err(|e| AppError::Database(format!("Failed to create Qdrant client: {}", e)))?
        };

        let store = Self { client };
        store.ensure_collection(dimensions).await?;
        Ok(store)
    }

    async fn ensure_collection(&self, dimensions: usize) -> Result<()> {
        let collections = self
            .client
            .list_collections()
            .await
            .map_err(|e| AppError::Database(format!("Failed to list collections: {}", e)))?;

        let exists = collections.collections.iter().any(|c| c.name == COLLECTION);
        if !exists {
            self.client
                .create_collection(CreateCollectionBuilder::new(COLLECTION).vectors_config(
                    VectorParamsBuilder::new(dimensions as u64, Distance::Cosine),
                ))
                .await
                .map_err(|e| AppError::Database(format!("Failed to create collection: {}", e)))?;
            tracing::info!("Created Qdrant collection: {}", COLLECTION);
        }

        Ok(())
    }

    fn point_id(record_id: &str) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, record_id.as_bytes()).to_string()
    }

    fn chunk_from_payload(
        payload: &HashMap<String, qdrant_client::qdrant::Value>,
        score: f32,
    ) -> Option<ScoredChunk> {
        Some(ScoredChunk {
            id: payload.get("id")?.as_str()?.to_string(),
            document_id: payload.get("document_id")?.as_str()?.to_string(),
            chunk_index: payload.get("chunk_index")?.as_integer()? as usize,
            text: payload.get("text")?.as_str()?.to_string(),
            file_name: payload.get("file_name")?.as_str()?.to_string(),
            score,
        })
    }

    fn document_filter(document_id: &str) -> Filter {
        Filter::must([Condition::matches(
            "document_id",
            document_id.to_string(),
        )])
    }
}

#[async_trait]
impl VectorStore for QdrantVectorStore {
    fn provider_name(&self) -> &'static str {
        "qdrant"
    }

    async fn upsert(&self, records: &[EmbeddingRecord]) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }

        let points: Vec<PointStruct> = records
            .iter()
            .map(|record| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("id".to_string(), record.id.clone().into());
                payload.insert("document_id".to_string(), record.document_id.clone().into());
                payload.insert("chunk_index".to_string(), (record.chunk_index as i64).into());
                payload.insert("text".to_string(), record.text.clone().into());
                payload.insert("file_name".to_string(), record.file_name.clone().into());
                payload.insert(
                    "created_at".to_string(),
                    record.created_at.timestamp().into(),
                );

                PointStruct::new(Self::point_id(&record.id), record.vector.clone(), payload)
            })
            .collect();

        let count = points.len();
        self.client
            .upsert_points(UpsertPointsBuilder::new(COLLECTION, points).wait(true))
            .await
            .map_err(|e| AppError::Database(format!("Failed to upsert points: {}", e)))?;

        Ok(count)
    }

    async fn search(
        &self,
        embedding: &[f32],
        limit: usize,
        threshold: f32,
        document_id: Option<&str>,
    ) -> Result<Vec<ScoredChunk>> {
        let mut builder = SearchPointsBuilder::new(COLLECTION, embedding.to_vec(), limit as u64)
            .with_payload(true)
            .score_threshold(threshold);

        if let Some(id) = document_id {
            builder = builder.filter(Self::document_filter(id));
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| AppError::Database(format!("Failed to search points: {}", e)))?;

        Ok(response
            .result
            .into_iter()
            .filter_map(|point| Self::chunk_from_payload(&point.payload, point.score))
            .collect())
    }

    async fn delete_by_document(&self, document_id: &str) -> Result<usize> {
        // Count first: the delete response does not report how many matched
        let count = self
            .client
            .count(
                CountPointsBuilder::new(COLLECTION)
                    .filter(Self::document_filter(document_id))
                    .exact(true),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to count points: {}", e)))?
            .result
            .map(|r| r.count as usize)
            .unwrap_or(0);

        self.client
            .delete_points(
                DeletePointsBuilder::new(COLLECTION)
                    .points(Self::document_filter(document_id))
                    .wait(true),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete points: {}", e)))?;

        Ok(count)
    }

    async fn chunks_for_document(&self, document_id: &str) -> Result<Vec<ScoredChunk>> {
        let response = self
            .client
            .scroll(
                ScrollPointsBuilder::new(COLLECTION)
                    .filter(Self::document_filter(document_id))
                    .with_payload(true)
                    .limit(1000),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to scroll points: {}", e)))?;

        let mut chunks: Vec<ScoredChunk> = response
            .result
            .into_iter()
            .filter_map(|point| Self::chunk_from_payload(&point.payload, 1.0))
            .collect();

        chunks.sort_by_key(|c| c.chunk_index);
        Ok(chunks)
    }

    async fn count(&self) -> Result<usize> {
        let response = self
            .client
            .count(CountPointsBuilder::new(COLLECTION).exact(true))
            .await
            .map_err(|e| AppError::Database(format!("Failed to count points: {}", e)))?;

        Ok(response.result.map(|r| r.count as usize).unwrap_or(0))
    }
}
