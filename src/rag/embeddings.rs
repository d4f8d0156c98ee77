use crate::types::Result;

#[cfg(feature = "local-embeddings")]
use crate::types::AppError;

/// Text embedding provider.
///
/// Implementations are synchronous; embedding is compute-bound and callers
/// batch their inputs. Tests substitute a deterministic implementation.
pub trait Embedder: Send + Sync {
    /// Model identifier.
    fn model_name(&self) -> &str;

    /// Embedding vector dimensionality.
    fn dimensions(&self) -> usize;

    /// Embed a batch of texts, one vector per input, in order.
    fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>>;

    /// Embed a single text (e.g. a search query).
    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(vec![text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| crate::types::AppError::Internal("Empty embedding batch".to_string()))
    }
}

/// Local ONNX embedding model via fastembed (AllMiniLM-L6-v2, 384 dims).
///
/// The model file is downloaded on first use and cached. `TextEmbedding`
/// needs `&mut` for inference, hence the mutex.
#[cfg(feature = "local-embeddings")]
pub struct LocalEmbedder {
    model: parking_lot::Mutex<fastembed::TextEmbedding>,
}

#[cfg(feature = "local-embeddings")]
impl LocalEmbedder {
    pub const DIMENSIONS: usize = 384;

    pub fn new() -> Result<Self> {
        let model = fastembed::TextEmbedding::try_new(
            fastembed::InitOptions::new(fastembed::EmbeddingModel::AllMiniLML6V2)
                .with_show_download_progress(true),
        )
        .map_err(|e| AppError::Internal(format!("Failed to load embedding model: {}", e)))?;

        tracing::info!("Embedding model loaded: all-minilm-l6-v2");

        Ok(Self {
            model: parking_lot::Mutex::new(model),
        })
    }
}

#[cfg(feature = "local-embeddings")]
impl Embedder for LocalEmbedder {
    fn model_name(&self) -> &str {
        "all-minilm-l6-v2"
    }

    fn dimensions(&self) -> usize {
        Self::DIMENSIONS
    }

    fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        self.model
            .lock()
            .embed(texts, None)
            .map_err(|e| AppError::Internal(format!("Embedding failed: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Deterministic embedder used across the crate's tests.
    pub struct HashEmbedder {
        dims: usize,
    }

    impl HashEmbedder {
        pub fn new(dims: usize) -> Self {
            Self { dims }
        }
    }

    impl Embedder for HashEmbedder {
        fn model_name(&self) -> &str {
            "hash-test"
        }

        fn dimensions(&self) -> usize {
            self.dims
        }

        fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
            Ok(texts
                .iter()
                .map(|text| {
                    (0..self.dims)
                        .map(|i| {
                            let byte = text.as_bytes().get(i % text.len().max(1)).copied();
                            byte.unwrap_or(0) as f32 / 255.0
                        })
                        .collect()
                })
                .collect())
        }
    }

    #[test]
    fn embed_one_returns_first_vector() {
        let embedder = HashEmbedder::new(8);
        let vector = embedder.embed_one("hello").unwrap();
        assert_eq!(vector.len(), 8);
    }

    #[test]
    fn batch_preserves_order_and_count() {
        let embedder = HashEmbedder::new(4);
        let vectors = embedder
            .embed(vec!["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(vectors.len(), 3);
        assert_ne!(vectors[0], vectors[1]);
    }
}
