//! HTTP API.
//!
//! Routes are grouped by concern: research queries, session management,
//! document upload, external search, and health. See [`routes::create_router`]
//! for the full surface.

/// Request handlers organized by functionality.
pub mod handlers;
/// Route table and middleware assembly.
pub mod routes;

pub use routes::{app, create_router};
