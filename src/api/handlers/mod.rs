//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Document upload, listing, deletion, and chunk retrieval.
pub mod documents;
/// Health and service status handlers.
pub mod health;
/// Research query handlers (pipeline and quick answer).
pub mod research;
/// External and semantic search handlers.
pub mod search;
/// Session management handlers.
pub mod sessions;
