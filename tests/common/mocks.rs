//! Mock implementations and state builders shared across test files.

use aria::llm::LLMClient;
use aria::rag::Embedder;
use aria::sources::{ArxivClient, PerplexityClient};
use aria::types::{AppError, Result};
use aria::utils::config::{Config, LlmConfig, RagConfig, SearchConfig, ServerConfig, StorageConfig};
use aria::{AppState, EmbeddedVectorStore, StoreClient};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;

/// Mock LLM client that answers per agent role and records call order.
///
/// Responses are selected by inspecting the system prompt, so a single mock
/// drives the whole pipeline: the route decision, the researcher synthesis,
/// the summarizer, and the analyst.
pub struct MockLLMClient {
    route: String,
    calls: Mutex<Vec<String>>,
    should_fail: bool,
}

impl MockLLMClient {
    /// A mock that routes every query to the given route ("research" or
    /// "memory") and returns canned stage outputs.
    pub fn routing(route: &str) -> Self {
        Self {
            route: route.to_string(),
            calls: Mutex::new(Vec::new()),
            should_fail: false,
        }
    }

    /// A mock that always returns an error.
    pub fn failing() -> Self {
        Self {
            route: "research".to_string(),
            calls: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// Labels of the calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn respond(&self, label: &str, response: &str) -> Result<String> {
        if self.should_fail {
            return Err(AppError::Llm("Mock LLM failure".to_string()));
        }
        self.calls.lock().push(label.to_string());
        Ok(response.to_string())
    }
}

#[async_trait]
impl LLMClient for MockLLMClient {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.respond("plain", "A quick answer.")
    }

    async fn generate_with_system(&self, system: &str, _prompt: &str) -> Result<String> {
        if system.contains("needs new external retrieval") {
            let route = self.route.clone();
            return self.respond("router", &route);
        }
        if system.contains("Research Agent") {
            return self.respond("researcher", "Synthesized findings with citations [1].");
        }
        if system.contains("Summarizer Agent") {
            return self.respond("summarizer", "Organized summary of findings [1].");
        }
        if system.contains("Analyst Agent") {
            return self.respond("analyst", "Final analysis answering the question [1].");
        }
        self.respond("unknown", "Unexpected system prompt.")
    }

    async fn generate_with_history(&self, _messages: &[(String, String)]) -> Result<String> {
        self.respond("history", "A historical answer.")
    }

    fn model_name(&self) -> &str {
        "mock-llm"
    }
}

/// Deterministic embedder: vectors derived from text bytes, no model needed.
pub struct MockEmbedder {
    dims: usize,
}

impl MockEmbedder {
    pub fn new(dims: usize) -> Self {
        Self { dims }
    }
}

impl Embedder for MockEmbedder {
    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dimensions(&self) -> usize {
        self.dims
    }

    fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let bytes = text.as_bytes();
                (0..self.dims)
                    .map(|i| match bytes.get(i % bytes.len().max(1)) {
                        Some(b) => *b as f32 / 255.0,
                        None => 0.0,
                    })
                    .collect()
            })
            .collect())
    }
}

/// Configuration pointing at in-memory stores and the given mock endpoints.
pub fn test_config(arxiv_base: &str, perplexity_base: &str, upload_dir: &str) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        storage: StorageConfig {
            database_path: ":memory:".to_string(),
            vector_path: String::new(),
            upload_dir: upload_dir.to_string(),
            max_upload_size_mb: 1,
            #[cfg(feature = "qdrant")]
            qdrant_url: None,
            #[cfg(feature = "qdrant")]
            qdrant_api_key: None,
        },
        llm: LlmConfig {
            gemini_api_key: "test-key".to_string(),
            gemini_model: "mock-llm".to_string(),
            gemini_base_url: "http://127.0.0.1:0".to_string(),
        },
        search: SearchConfig {
            perplexity_api_key: "test-key".to_string(),
            perplexity_base_url: perplexity_base.to_string(),
            arxiv_base_url: arxiv_base.to_string(),
        },
        rag: RagConfig {
            chunk_size: 200,
            chunk_overlap: 40,
        },
        user_id: "default_user".to_string(),
    }
}

/// Fully wired state over in-memory stores and a mock LLM.
pub async fn test_state(
    llm: Arc<dyn LLMClient>,
    arxiv_base: &str,
    perplexity_base: &str,
    upload_dir: &str,
) -> AppState {
    let config = Arc::new(test_config(arxiv_base, perplexity_base, upload_dir));

    let store = Arc::new(StoreClient::new_memory().await.expect("store"));
    store
        .ensure_user(&config.user_id, &config.user_id)
        .await
        .expect("user");

    let embedder: Arc<dyn Embedder> = Arc::new(MockEmbedder::new(8));
    let vectors = Arc::new(
        EmbeddedVectorStore::new(None, embedder.dimensions())
            .await
            .expect("vectors"),
    );

    let arxiv = Arc::new(ArxivClient::new(arxiv_base.to_string()).expect("arxiv"));
    let web = Arc::new(
        PerplexityClient::new("test-key".to_string(), perplexity_base.to_string())
            .expect("perplexity"),
    );

    AppState::new(config, store, vectors, embedder, llm, arxiv, web)
}

/// A minimal arXiv Atom feed with one entry.
pub const ARXIV_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:arxiv="http://arxiv.org/schemas/atom">
  <entry>
    <id>http://arxiv.org/abs/2301.12345v1</id>
    <updated>2023-02-01T10:00:00Z</updated>
    <published>2023-01-28T08:30:00Z</published>
    <title>Advances in Transformer Models</title>
    <summary>A survey of recent transformer advances.</summary>
    <author><name>Grace Hopper</name></author>
    <link title="pdf" href="http://arxiv.org/pdf/2301.12345v1" rel="related" type="application/pdf"/>
    <arxiv:primary_category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
    <category term="cs.LG" scheme="http://arxiv.org/schemas/atom"/>
  </entry>
</feed>"#;

/// A Perplexity chat-completions response with citations.
pub const PERPLEXITY_RESPONSE: &str = r#"{
  "choices": [
    {"message": {"role": "assistant", "content": "Transformers keep improving."}}
  ],
  "citations": ["https://example.org/transformers"]
}"#;
