//! LLM Client Abstractions
//!
//! This module provides a unified interface for the language model that powers
//! the agent pipeline. All agents consume the [`LLMClient`] trait so tests can
//! substitute a mock without touching agent code.
//!
//! # Supported Providers
//!
//! - [`GeminiClient`] - Google Generative Language REST API (default:
//!   `gemini-2.0-flash-exp`)
//!
//! # Example
//!
//! ```ignore
//! use aria::llm::{GeminiClient, LLMClient};
//!
//! let client = GeminiClient::new(api_key, base_url, model);
//! let answer = client.generate("What is retrieval augmented generation?").await?;
//! ```

/// Core LLM client trait.
pub mod client;
/// Google Gemini REST client.
pub mod gemini;

pub use client::LLMClient;
pub use gemini::GeminiClient;
