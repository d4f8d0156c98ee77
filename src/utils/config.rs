use serde::Deserialize;
use std::env;

use crate::types::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub search: SearchConfig,
    pub rag: RagConfig,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// SQLite database path; `:memory:` for an ephemeral store.
    pub database_path: String,
    /// Directory for the embedded vector store; empty for in-memory only.
    pub vector_path: String,
    pub upload_dir: String,
    pub max_upload_size_mb: usize,
    #[cfg(feature = "qdrant")]
    pub qdrant_url: Option<String>,
    #[cfg(feature = "qdrant")]
    pub qdrant_api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    pub perplexity_api_key: String,
    pub perplexity_base_url: String,
    pub arxiv_base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RagConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present).
    ///
    /// API keys are required; everything else falls back to local-first
    /// defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: env_parse("PORT", 8000)?,
            },
            storage: StorageConfig {
                database_path: env::var("DATABASE_PATH")
                    .unwrap_or_else(|_| "data/aria.db".to_string()),
                vector_path: env::var("VECTOR_PATH").unwrap_or_else(|_| "data/vectors".to_string()),
                upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "data/uploads".to_string()),
                max_upload_size_mb: env_parse("MAX_UPLOAD_SIZE_MB", 10)?,
                #[cfg(feature = "qdrant")]
                qdrant_url: env::var("QDRANT_URL").ok(),
                #[cfg(feature = "qdrant")]
                qdrant_api_key: env::var("QDRANT_API_KEY").ok(),
            },
            llm: LlmConfig {
                gemini_api_key: require("GEMINI_API_KEY")?,
                gemini_model: env::var("GEMINI_MODEL")
                    .unwrap_or_else(|_| "gemini-2.0-flash-exp".to_string()),
                gemini_base_url: env::var("GEMINI_BASE_URL").unwrap_or_else(|_| {
                    "https://generativelanguage.googleapis.com/v1beta".to_string()
                }),
            },
            search: SearchConfig {
                perplexity_api_key: require("PERPLEXITY_API_KEY")?,
                perplexity_base_url: env::var("PERPLEXITY_BASE_URL")
                    .unwrap_or_else(|_| "https://api.perplexity.ai".to_string()),
                arxiv_base_url: env::var("ARXIV_BASE_URL")
                    .unwrap_or_else(|_| "http://export.arxiv.org/api".to_string()),
            },
            rag: RagConfig {
                chunk_size: env_parse("CHUNK_SIZE", 1000)?,
                chunk_overlap: env_parse("CHUNK_OVERLAP", 200)?,
            },
            user_id: env::var("USER_ID").unwrap_or_else(|_| "default_user".to_string()),
        })
    }

    /// Upload limit in bytes, for both the multipart handler and the
    /// request body limit layer.
    pub fn max_upload_size_bytes(&self) -> usize {
        self.storage.max_upload_size_mb * 1024 * 1024
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        AppError::Configuration(format!("Missing required environment variable: {}", key))
    })
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Configuration(format!("Invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_upload_size_converts_to_bytes() {
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".into(),
                port: 8000,
            },
            storage: StorageConfig {
                database_path: ":memory:".into(),
                vector_path: String::new(),
                upload_dir: "data/uploads".into(),
                max_upload_size_mb: 10,
                #[cfg(feature = "qdrant")]
                qdrant_url: None,
                #[cfg(feature = "qdrant")]
                qdrant_api_key: None,
            },
            llm: LlmConfig {
                gemini_api_key: "key".into(),
                gemini_model: "gemini-2.0-flash-exp".into(),
                gemini_base_url: "http://localhost".into(),
            },
            search: SearchConfig {
                perplexity_api_key: "key".into(),
                perplexity_base_url: "http://localhost".into(),
                arxiv_base_url: "http://localhost".into(),
            },
            rag: RagConfig {
                chunk_size: 1000,
                chunk_overlap: 200,
            },
            user_id: "default_user".into(),
        };

        assert_eq!(config.max_upload_size_bytes(), 10 * 1024 * 1024);
    }
}
