use crate::{
    agents::{prompts, Agent, PipelineState, Stage},
    llm::LLMClient,
    types::Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Condenses the researched material into an organized summary,
/// preserving citations.
pub struct SummarizerAgent {
    llm: Arc<dyn LLMClient>,
}

impl SummarizerAgent {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Agent for SummarizerAgent {
    async fn run(&self, state: &mut PipelineState) -> Result<()> {
        tracing::info!("Starting summarizer phase");
        state.current_stage = Stage::Summarize;

        let prompt = format!(
            "Original Question: {}\n\nResearch Findings:\n{}\n\nTask: Create a clear, concise summary of these research findings.\nOrganize by key themes, highlight main points, and preserve important citations.",
            state.query, state.research_synthesis
        );

        state.summary = self
            .llm
            .generate_with_system(self.system_prompt(), &prompt)
            .await?;

        tracing::info!("Summarizer phase completed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "summarizer"
    }

    fn system_prompt(&self) -> &'static str {
        prompts::SUMMARIZER
    }
}
