use crate::{
    agents::{prompts, Agent, PipelineState, Stage},
    llm::LLMClient,
    types::Result,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Produces the final answer: insights, implications, limitations, and
/// recommendations grounded in the summary.
pub struct AnalystAgent {
    llm: Arc<dyn LLMClient>,
}

impl AnalystAgent {
    pub fn new(llm: Arc<dyn LLMClient>) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Agent for AnalystAgent {
    async fn run(&self, state: &mut PipelineState) -> Result<()> {
        tracing::info!("Starting analyst phase");
        state.current_stage = Stage::Analyze;

        // Last three turns give the analyst conversational context
        let mut history_context = String::new();
        if !state.history.is_empty() {
            history_context.push_str("\n\nPrevious Conversation Context:\n");
            for message in state.history.iter().rev().take(3).rev() {
                let preview: String = message.content.chars().take(200).collect();
                history_context.push_str(&format!("{}: {}...\n", message.role.as_str(), preview));
            }
        }

        let prompt = format!(
            "Original Question: {}{}\n\nResearch Summary:\n{}\n\nTask: Provide a comprehensive analysis that:\n1. Directly answers the user's question\n2. Identifies key insights and patterns\n3. Discusses implications and significance\n4. Notes any limitations or gaps\n5. Offers actionable takeaways or recommendations\n\nBe thorough yet clear. Support your analysis with evidence from the research.",
            state.query, history_context, state.summary
        );

        state.final_answer = self
            .llm
            .generate_with_system(self.system_prompt(), &prompt)
            .await?;
        state.current_stage = Stage::Done;

        tracing::info!("Analysis completed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "analyst"
    }

    fn system_prompt(&self) -> &'static str {
        prompts::ANALYST
    }
}
