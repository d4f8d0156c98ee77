//! Retrieval substrate for the research pipeline.
//!
//! - [`chunker`] - splits extracted document text into overlapping,
//!   sentence-aware chunks sized for embedding
//! - [`embeddings`] - the [`embeddings::Embedder`] trait and the local
//!   fastembed-backed implementation (AllMiniLM-L6-v2, 384 dimensions)
//!
//! Ingestion flow: extract -> chunk -> embed -> upsert into the vector store.
//! Retrieval flow: embed query -> cosine top-k against stored chunks.

pub mod chunker;
pub mod embeddings;

pub use chunker::TextChunker;
pub use embeddings::Embedder;
