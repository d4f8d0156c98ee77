//! # A.R.I.A. - Agentic Research Intelligence Assistant
//!
//! A single-user multi-agent research server. User queries flow through a
//! fixed Researcher -> Summarizer -> Analyst pipeline backed by an embedded
//! session/document store and a vector store of chunk embeddings, fed by
//! arXiv paper search, Perplexity web search, and the user's uploaded
//! documents.
//!
//! ## Overview
//!
//! A.R.I.A. can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `aria-server` binary
//! 2. **As a library** - Import components into your own Rust project
//!
//! ### Basic Example
//!
//! ```rust,ignore
//! use aria::llm::{GeminiClient, LLMClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GeminiClient::new(api_key, base_url, model)?;
//!     let answer = client.generate("What is semantic search?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `local-embeddings` | Local ONNX embeddings via fastembed (default) |
//! | `qdrant` | Qdrant vector store backend |
//!
//! ## Modules
//!
//! - [`agents`] - The research pipeline (Researcher, Summarizer, Analyst)
//! - [`api`] - REST API handlers and routes
//! - [`db`] - Session/document store and vector stores
//! - [`ingest`] - Document upload processing
//! - [`llm`] - LLM client abstraction (Gemini)
//! - [`memory`] - Session memory and prompt context
//! - [`rag`] - Chunking and embeddings
//! - [`sources`] - External search clients (arXiv, Perplexity)
//! - [`types`] - Common types and error handling

#![warn(missing_docs)]

/// The multi-agent research pipeline.
pub mod agents;
/// HTTP API handlers and routes.
pub mod api;
/// Session/document store and vector stores.
pub mod db;
/// Document ingestion pipeline.
pub mod ingest;
/// LLM provider clients and abstractions.
pub mod llm;
/// Session memory and prompt context management.
pub mod memory;
/// Chunking and embedding components.
pub mod rag;
/// External research source clients.
pub mod sources;
/// Core types (requests, responses, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use agents::{Orchestrator, QueryOutcome};
pub use db::{EmbeddedVectorStore, StoreClient, VectorStore};
pub use llm::{GeminiClient, LLMClient};
pub use types::{AppError, Result};
pub use utils::Config;

use crate::agents::researcher::ResearcherAgent;
use crate::ingest::DocumentPipeline;
use crate::memory::MemoryService;
use crate::rag::{Embedder, TextChunker};
use crate::sources::{ArxivClient, PerplexityClient};
use std::sync::Arc;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Environment-derived configuration.
    pub config: Arc<Config>,
    /// Session/document store.
    pub store: Arc<StoreClient>,
    /// Vector store of chunk embeddings.
    pub vectors: Arc<dyn VectorStore>,
    /// Text embedding provider.
    pub embedder: Arc<dyn Embedder>,
    /// Language model powering the agents.
    pub llm: Arc<dyn LLMClient>,
    /// arXiv search client.
    pub arxiv: Arc<ArxivClient>,
    /// Perplexity web search client.
    pub web: Arc<PerplexityClient>,
    /// Session memory service.
    pub memory: Arc<MemoryService>,
    /// Document ingestion pipeline.
    pub documents: Arc<DocumentPipeline>,
}

impl AppState {
    /// Assemble state from pre-built components.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Arc<Config>,
        store: Arc<StoreClient>,
        vectors: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
        llm: Arc<dyn LLMClient>,
        arxiv: Arc<ArxivClient>,
        web: Arc<PerplexityClient>,
    ) -> Self {
        let memory = Arc::new(MemoryService::new(store.clone(), config.user_id.clone()));
        let documents = Arc::new(DocumentPipeline::new(
            store.clone(),
            vectors.clone(),
            embedder.clone(),
            TextChunker::new(config.rag.chunk_size, config.rag.chunk_overlap),
            config.storage.upload_dir.clone(),
            config.max_upload_size_bytes(),
            config.user_id.clone(),
        ));

        Self {
            config,
            store,
            vectors,
            embedder,
            llm,
            arxiv,
            web,
            memory,
            documents,
        }
    }

    /// Build a per-request orchestrator over the shared components.
    pub fn orchestrator(&self) -> Orchestrator {
        let researcher = ResearcherAgent::new(
            self.llm.clone(),
            self.arxiv.clone(),
            self.web.clone(),
            self.vectors.clone(),
            self.embedder.clone(),
        );

        Orchestrator::new(self.llm.clone(), researcher, self.memory.clone())
    }
}
