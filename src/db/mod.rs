//! Storage layer.
//!
//! Two stores back the assistant:
//!
//! - **[`store::StoreClient`]**: embedded SQLite (libsql) holding the user
//!   profile, sessions, conversation turns, and document metadata.
//! - **Vector stores**: chunk embeddings behind the
//!   [`vectorstore::VectorStore`] trait. The default backend is the embedded
//!   cosine store; a Qdrant backend is available behind the `qdrant` feature:
//!
//! ```toml
//! aria-server = { version = "*", features = ["qdrant"] }
//! ```

pub mod store;
pub mod vectorstore;

#[cfg(feature = "qdrant")]
pub mod qdrant;

pub use store::StoreClient;
pub use vectorstore::{EmbeddedVectorStore, VectorStore};

#[cfg(feature = "qdrant")]
pub use qdrant::QdrantVectorStore;
