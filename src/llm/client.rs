use crate::types::Result;
use async_trait::async_trait;

/// Generic LLM client trait for provider abstraction.
///
/// Every agent (and the orchestrator's route decision) works against this
/// trait, allowing the provider to be swapped or mocked without changing
/// pipeline code.
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Generate a completion from a prompt.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Generate with a system prompt.
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String>;

    /// Generate with conversation history as (role, content) pairs.
    async fn generate_with_history(&self, messages: &[(String, String)]) -> Result<String>;

    /// Get the model name/identifier.
    fn model_name(&self) -> &str;
}
