use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ============= API Request/Response Types =============

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchQueryRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResearchQueryResponse {
    pub answer: String,
    pub sources: Vec<String>,
    pub processing_time: f64,
    pub confidence: f32,
    pub session_id: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuickAnswerRequest {
    pub query: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuickAnswerResponse {
    pub answer: String,
    #[serde(rename = "type")]
    pub answer_type: String,
    pub sources: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionInfo {
    pub session_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub message_count: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentProcessingStatus {
    pub document_id: String,
    pub file_name: String,
    pub status: DocumentStatus,
    pub message: String,
    pub chunk_count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentInfo {
    pub document_id: String,
    pub file_name: String,
    pub file_type: String,
    pub file_size_bytes: i64,
    pub status: DocumentStatus,
    pub chunk_count: i64,
    pub created_at: DateTime<Utc>,
}

// ============= Conversation Types =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// One persisted question/answer exchange within a session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ConversationTurn {
    pub id: String,
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    /// Originating agent name; empty for user turns.
    pub agent: String,
    pub sources: Vec<String>,
    pub processing_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub message_count: i64,
}

/// Singleton profile for the hardcoded single-user mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub total_sessions: i64,
    pub total_documents: i64,
}

// ============= Document Types =============

/// Processing status of an uploaded document.
///
/// Transitions: Pending -> Processing -> Done | Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    Pending,
    Processing,
    Done,
    Failed,
}

impl DocumentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "pending",
            DocumentStatus::Processing => "processing",
            DocumentStatus::Done => "done",
            DocumentStatus::Failed => "failed",
        }
    }
}

impl std::str::FromStr for DocumentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(DocumentStatus::Pending),
            "processing" => Ok(DocumentStatus::Processing),
            "done" => Ok(DocumentStatus::Done),
            "failed" => Ok(DocumentStatus::Failed),
            other => Err(AppError::Internal(format!(
                "Unknown document status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub id: String,
    pub user_id: String,
    pub file_name: String,
    pub file_path: String,
    pub file_type: String,
    pub file_size_bytes: i64,
    pub extraction_method: String,
    pub status: DocumentStatus,
    pub chunk_count: i64,
    /// Populated when status is Failed.
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ============= Embedding Types =============

/// A single embedded text chunk, keyed by its parent document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingRecord {
    /// `<document_id>_chunk_<index>`
    pub id: String,
    pub document_id: String,
    pub chunk_index: usize,
    pub text: String,
    pub vector: Vec<f32>,
    pub file_name: String,
    pub created_at: DateTime<Utc>,
}

/// A chunk returned from similarity search, with its score.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ScoredChunk {
    pub id: String,
    pub document_id: String,
    pub chunk_index: usize,
    pub text: String,
    pub file_name: String,
    pub score: f32,
}

// ============= Research Source Types =============

/// One arXiv paper as returned by the Atom API.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Paper {
    pub title: String,
    pub authors: String,
    pub summary: String,
    pub published: String,
    pub updated: String,
    pub arxiv_id: String,
    pub pdf_url: String,
    pub primary_category: String,
    pub categories: String,
    pub doi: String,
    pub journal_ref: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WebSearchResult {
    pub query: String,
    pub focus: String,
    pub content: String,
    pub citations: String,
    pub model: String,
}

/// Raw material gathered by the Researcher across all sources.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResearchFindings {
    pub query: String,
    pub papers: Vec<Paper>,
    pub web: Option<WebSearchResult>,
    pub chunks: Vec<ScoredChunk>,
    pub sources_count: usize,
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Search source error: {0}")]
    Source(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Database(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Llm(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Source(msg) => (axum::http::StatusCode::BAD_GATEWAY, msg),
            AppError::NotFound(msg) => (axum::http::StatusCode::NOT_FOUND, msg),
            AppError::InvalidInput(msg) => (axum::http::StatusCode::BAD_REQUEST, msg),
            AppError::Configuration(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (axum::http::StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_status_round_trips_through_str() {
        for status in [
            DocumentStatus::Pending,
            DocumentStatus::Processing,
            DocumentStatus::Done,
            DocumentStatus::Failed,
        ] {
            assert_eq!(DocumentStatus::from_str(status.as_str()).unwrap(), status);
        }
    }

    #[test]
    fn document_status_rejects_unknown() {
        assert!(DocumentStatus::from_str("uploaded").is_err());
    }

    #[test]
    fn message_role_serializes_lowercase() {
        let json = serde_json::to_string(&MessageRole::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
