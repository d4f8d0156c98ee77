use crate::{
    agents::{
        analyst::AnalystAgent, prompts, researcher::ResearcherAgent, summarizer::SummarizerAgent,
        Agent, PipelineState,
    },
    llm::LLMClient,
    memory::{ContextWindow, MemoryService},
    types::{MessageRole, Result},
};
use std::sync::Arc;
use std::time::Instant;

const HISTORY_LIMIT: usize = 10;
/// Token budget for history spliced into agent prompts.
const HISTORY_TOKEN_BUDGET: usize = 4000;

/// Whether a query needs new retrieval or can be answered from memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Research,
    Memory,
}

/// Result of a fully processed query.
#[derive(Debug)]
pub struct QueryOutcome {
    pub answer: String,
    pub sources: Vec<String>,
    pub processing_time: f64,
    pub session_id: String,
    pub sources_count: usize,
}

/// Sequences the Researcher -> Summarizer -> Analyst pipeline for a query
/// and persists the resulting conversation turns.
pub struct Orchestrator {
    llm: Arc<dyn LLMClient>,
    researcher: ResearcherAgent,
    summarizer: SummarizerAgent,
    analyst: AnalystAgent,
    memory: Arc<MemoryService>,
}

impl Orchestrator {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        researcher: ResearcherAgent,
        memory: Arc<MemoryService>,
    ) -> Self {
        let summarizer = SummarizerAgent::new(llm.clone());
        let analyst = AnalystAgent::new(llm.clone());

        Self {
            llm,
            researcher,
            summarizer,
            analyst,
            memory,
        }
    }

    /// One LLM call deciding the route. Anything that does not clearly say
    /// "memory" runs the full research pipeline.
    async fn decide_route(&self, query: &str) -> Route {
        match self.llm.generate_with_system(prompts::ROUTER, query).await {
            Ok(answer) => {
                if answer.trim().to_lowercase().starts_with("memory") {
                    Route::Memory
                } else {
                    Route::Research
                }
            }
            Err(error) => {
                tracing::warn!("Route decision failed, defaulting to research: {}", error);
                Route::Research
            }
        }
    }

    /// Process a query through the agent pipeline.
    pub async fn process_query(
        &self,
        query: &str,
        session_id: Option<String>,
    ) -> Result<QueryOutcome> {
        let start = Instant::now();

        let session_id = match session_id {
            Some(id) => {
                if !self.memory.session_exists(&id).await? {
                    return Err(crate::types::AppError::NotFound(format!(
                        "Session not found: {}",
                        id
                    )));
                }
                id
            }
            None => self.memory.get_active_session().await?,
        };

        let turns = self
            .memory
            .get_session_history(&session_id, HISTORY_LIMIT)
            .await?;
        let mut window = ContextWindow::new(HISTORY_TOKEN_BUDGET);
        window.extend_from_turns(&turns);
        let history = window.messages();

        tracing::info!("Processing query: {}", query);

        let route = self.decide_route(query).await;
        let mut state = PipelineState::new(query, &session_id, history);

        match route {
            Route::Research => {
                self.researcher.run(&mut state).await?;
            }
            Route::Memory => {
                // Memory-sufficient queries skip the Researcher stage
                tracing::info!("Answering from existing memory");
                self.researcher.recall(&mut state).await?;
            }
        }

        self.summarizer.run(&mut state).await?;
        self.analyst.run(&mut state).await?;

        let processing_time = start.elapsed().as_secs_f64();

        self.memory
            .add_message(&session_id, MessageRole::User, query, "", vec![], 0.0)
            .await?;
        self.memory
            .add_message(
                &session_id,
                MessageRole::Assistant,
                &state.final_answer,
                self.analyst.name(),
                state.sources.clone(),
                processing_time,
            )
            .await?;

        tracing::info!("Query processed successfully in {:.2}s", processing_time);

        Ok(QueryOutcome {
            answer: state.final_answer,
            sources: state.sources,
            processing_time,
            session_id,
            sources_count: state.findings.sources_count,
        })
    }
}
