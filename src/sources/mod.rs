//! External research source clients.
//!
//! The Researcher agent gathers raw material from three source types:
//!
//! - [`arxiv::ArxivClient`] - academic paper search over the arXiv Atom API
//! - [`perplexity::PerplexityClient`] - web search via the Perplexity API
//! - the vector store of the user's uploaded documents (see [`crate::db`])
//!
//! All clients are plain `reqwest` wrappers with a 30s timeout; base URLs are
//! configurable so tests can point them at a local mock server.

/// arXiv Atom API client.
pub mod arxiv;
/// Perplexity web search client.
pub mod perplexity;

pub use arxiv::ArxivClient;
pub use perplexity::PerplexityClient;
