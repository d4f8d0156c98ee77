//! Multi-agent research pipeline.
//!
//! Queries flow through a fixed three-stage pipeline, each stage an [`Agent`]
//! that reads and extends the shared [`PipelineState`]:
//!
//! ```text
//! query ──► Orchestrator ──► route decision (research | memory)
//!               │
//!               ├─ research ──► Researcher ─► Summarizer ─► Analyst ─► answer
//!               └─ memory   ────────────────► Summarizer ─► Analyst ─► answer
//! ```
//!
//! The Researcher fans out to its sources concurrently; everything else is
//! strictly sequential. The [`orchestrator::Orchestrator`] owns session
//! resolution, the route decision, and turn persistence.

pub mod analyst;
pub mod orchestrator;
pub mod prompts;
pub mod researcher;
pub mod summarizer;

pub use orchestrator::{Orchestrator, QueryOutcome};

use crate::types::{Message, ResearchFindings, Result};
use async_trait::async_trait;

/// Base trait for pipeline agents.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Execute this stage, reading and extending the shared state.
    async fn run(&self, state: &mut PipelineState) -> Result<()>;

    /// The agent's name, recorded on conversation turns and logs.
    fn name(&self) -> &'static str;

    /// The agent's system prompt.
    fn system_prompt(&self) -> &'static str;
}

/// Pipeline stage marker, updated as agents hand off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    Research,
    Summarize,
    Analyze,
    Done,
}

/// State shared between agents in the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub query: String,
    pub session_id: String,
    pub history: Vec<Message>,
    pub findings: ResearchFindings,
    pub research_synthesis: String,
    pub summary: String,
    pub final_answer: String,
    pub sources: Vec<String>,
    pub current_stage: Stage,
}

impl PipelineState {
    pub fn new(query: &str, session_id: &str, history: Vec<Message>) -> Self {
        Self {
            query: query.to_string(),
            session_id: session_id.to_string(),
            history,
            findings: ResearchFindings::default(),
            research_synthesis: String::new(),
            summary: String::new(),
            final_answer: String::new(),
            sources: Vec::new(),
            current_stage: Stage::Init,
        }
    }
}
