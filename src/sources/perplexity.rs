use crate::types::{AppError, Result, WebSearchResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_MODEL: &str = "llama-3.1-sonar-small-128k-online";

/// Client for web search via the Perplexity chat-completions API.
pub struct PerplexityClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl PerplexityClient {
    pub fn new(api_key: String, base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Search the web with the default (internet) focus.
    pub async fn search(&self, query: &str) -> Result<WebSearchResult> {
        self.search_with_focus(query, "internet").await
    }

    /// Search with a specific focus: `internet`, `academic`, or `general`.
    /// The focus selects the system prompt sent alongside the query.
    pub async fn search_with_focus(&self, query: &str, focus: &str) -> Result<WebSearchResult> {
        let system = match focus {
            "academic" => {
                "You are an academic research assistant. Provide scholarly information with proper citations."
            }
            "internet" => {
                "You are a helpful research assistant that provides accurate information with citations."
            }
            _ => "You are a helpful assistant that provides accurate information.",
        };

        let payload = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: query.to_string(),
                },
            ],
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::Source(format!("Perplexity request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Source(format!(
                "Perplexity API error {}: {}",
                status, body
            )));
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AppError::Source(format!("Failed to parse Perplexity response: {}", e)))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| AppError::Source("Empty response from Perplexity".to_string()))?;

        let citations = if body.citations.is_empty() {
            "No citations available".to_string()
        } else {
            body.citations.join(", ")
        };

        tracing::info!("Web search completed: {} (focus: {})", query, focus);

        Ok(WebSearchResult {
            query: query.to_string(),
            focus: focus.to_string(),
            content,
            citations,
            model: self.model.clone(),
        })
    }
}

// ============= Wire Types =============

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    citations: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}
