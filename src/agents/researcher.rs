use crate::{
    agents::{prompts, Agent, PipelineState, Stage},
    db::VectorStore,
    llm::LLMClient,
    rag::Embedder,
    sources::{ArxivClient, PerplexityClient},
    types::{Paper, Result, ScoredChunk, WebSearchResult},
};
use async_trait::async_trait;
use std::sync::Arc;

const ARXIV_MAX_RESULTS: usize = 5;
const DOCUMENT_CHUNK_LIMIT: usize = 5;

/// Gathers raw material from arXiv, the web, and uploaded documents, then
/// synthesizes it into a structured report.
pub struct ResearcherAgent {
    llm: Arc<dyn LLMClient>,
    arxiv: Arc<ArxivClient>,
    web: Arc<PerplexityClient>,
    vectors: Arc<dyn VectorStore>,
    embedder: Arc<dyn Embedder>,
}

impl ResearcherAgent {
    pub fn new(
        llm: Arc<dyn LLMClient>,
        arxiv: Arc<ArxivClient>,
        web: Arc<PerplexityClient>,
        vectors: Arc<dyn VectorStore>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            llm,
            arxiv,
            web,
            vectors,
            embedder,
        }
    }

    /// A failed source degrades to empty results; the stage never aborts
    /// because one of its sources is down.
    async fn search_arxiv(&self, query: &str) -> Vec<Paper> {
        match self.arxiv.search(query, ARXIV_MAX_RESULTS).await {
            Ok(papers) => {
                tracing::info!("Found {} papers on arXiv", papers.len());
                papers
            }
            Err(error) => {
                tracing::warn!("arXiv search failed: {}", error);
                Vec::new()
            }
        }
    }

    async fn search_web(&self, query: &str) -> Option<WebSearchResult> {
        match self.web.search_with_focus(query, "academic").await {
            Ok(result) => {
                tracing::info!("Web search completed");
                Some(result)
            }
            Err(error) => {
                tracing::warn!("Web search failed: {}", error);
                None
            }
        }
    }

    async fn search_documents(&self, query: &str) -> Vec<ScoredChunk> {
        let embedding = match self.embedder.embed_one(query) {
            Ok(embedding) => embedding,
            Err(error) => {
                tracing::warn!("Query embedding failed: {}", error);
                return Vec::new();
            }
        };

        match self
            .vectors
            .search(&embedding, DOCUMENT_CHUNK_LIMIT, 0.0, None)
            .await
        {
            Ok(chunks) => {
                tracing::info!("Found {} relevant document chunks", chunks.len());
                chunks
            }
            Err(error) => {
                tracing::warn!("Document search failed: {}", error);
                Vec::new()
            }
        }
    }

    /// Fetch from all three sources concurrently. No ordering is guaranteed
    /// between the fetches.
    pub async fn conduct_research(&self, state: &mut PipelineState) -> Result<()> {
        let (papers, web, chunks) = tokio::join!(
            self.search_arxiv(&state.query),
            self.search_web(&state.query),
            self.search_documents(&state.query),
        );

        let mut sources_count = papers.len() + chunks.len();
        if web.as_ref().is_some_and(|w| !w.content.is_empty()) {
            sources_count += 1;
        }

        state.findings.query = state.query.clone();
        state.findings.papers = papers;
        state.findings.web = web;
        state.findings.chunks = chunks;
        state.findings.sources_count = sources_count;

        tracing::info!("Research completed: {} sources found", sources_count);
        Ok(())
    }

    /// Memory-path recall: document chunks only, no external calls.
    pub async fn recall(&self, state: &mut PipelineState) -> Result<()> {
        let chunks = self.search_documents(&state.query).await;

        state.findings.query = state.query.clone();
        state.findings.sources_count = chunks.len();
        state.findings.chunks = chunks;
        state.research_synthesis = format_stored_material(&state.findings.chunks);
        state.sources = extract_sources(&state.findings);

        Ok(())
    }

    /// One LLM call turning the raw findings into a structured report.
    pub async fn synthesize_findings(&self, state: &mut PipelineState) -> Result<()> {
        let context = format_research_context(&state.findings);

        let prompt = format!(
            "Research Query: {}\n\nResearch Findings:\n{}\n\nTask: Synthesize these research findings into a clear, organized report with proper citations.\nFocus on the most relevant and reliable information.",
            state.query, context
        );

        state.research_synthesis = self
            .llm
            .generate_with_system(self.system_prompt(), &prompt)
            .await?;
        state.sources = extract_sources(&state.findings);

        tracing::info!("Research findings synthesized");
        Ok(())
    }
}

#[async_trait]
impl Agent for ResearcherAgent {
    async fn run(&self, state: &mut PipelineState) -> Result<()> {
        tracing::info!("Starting research phase for query: {}", state.query);
        state.current_stage = Stage::Research;

        self.conduct_research(state).await?;
        self.synthesize_findings(state).await?;

        tracing::info!("Research phase completed");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "researcher"
    }

    fn system_prompt(&self) -> &'static str {
        prompts::RESEARCHER
    }
}

/// Citation list for the API response: paper PDFs, web citations, file names.
fn extract_sources(findings: &crate::types::ResearchFindings) -> Vec<String> {
    let mut sources = Vec::new();

    for paper in &findings.papers {
        if !paper.pdf_url.is_empty() {
            sources.push(paper.pdf_url.clone());
        }
    }

    if let Some(web) = &findings.web {
        if !web.citations.is_empty() && web.citations != "No citations available" {
            sources.push(web.citations.clone());
        }
    }

    for chunk in &findings.chunks {
        if !sources.contains(&chunk.file_name) {
            sources.push(chunk.file_name.clone());
        }
    }

    sources
}

/// Prompt context for synthesis: top papers, web results, document chunks.
fn format_research_context(findings: &crate::types::ResearchFindings) -> String {
    let mut parts = Vec::new();

    if !findings.papers.is_empty() {
        parts.push("=== ARXIV PAPERS ===".to_string());
        for paper in findings.papers.iter().take(3) {
            parts.push(format!("\nTitle: {}", paper.title));
            parts.push(format!("Authors: {}", paper.authors));
            parts.push(format!("Summary: {}...", truncate(&paper.summary, 500)));
            parts.push(format!("URL: {}\n", paper.pdf_url));
        }
    }

    if let Some(web) = &findings.web {
        if !web.content.is_empty() {
            parts.push("\n=== WEB SEARCH RESULTS ===".to_string());
            parts.push(web.content.clone());
            parts.push(format!("\nCitations: {}", web.citations));
        }
    }

    if !findings.chunks.is_empty() {
        parts.push("\n=== USER DOCUMENTS ===".to_string());
        for chunk in findings.chunks.iter().take(3) {
            parts.push(format!("\nFrom: {}", chunk.file_name));
            parts.push(format!("Content: {}...", truncate(&chunk.text, 300)));
            parts.push(format!("Relevance: {}\n", chunk.score));
        }
    }

    if parts.is_empty() {
        parts.push("No research material was found for this query.".to_string());
    }

    parts.join("\n")
}

/// Memory-path material: stored chunks only, no synthesis call.
fn format_stored_material(chunks: &[crate::types::ScoredChunk]) -> String {
    if chunks.is_empty() {
        return "No stored material matched this query.".to_string();
    }

    let mut parts = vec!["=== STORED DOCUMENT EXCERPTS ===".to_string()];
    for chunk in chunks {
        parts.push(format!("\nFrom: {}", chunk.file_name));
        parts.push(format!("Content: {}", chunk.text));
        parts.push(format!("Relevance: {}\n", chunk.score));
    }
    parts.join("\n")
}

/// Char-boundary-safe prefix.
fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Paper, ResearchFindings, ScoredChunk, WebSearchResult};

    fn findings() -> ResearchFindings {
        ResearchFindings {
            query: "transformers".to_string(),
            papers: vec![Paper {
                title: "Attention".to_string(),
                pdf_url: "http://arxiv.org/pdf/1706.03762".to_string(),
                summary: "Attention is all you need.".to_string(),
                ..Default::default()
            }],
            web: Some(WebSearchResult {
                query: "transformers".to_string(),
                focus: "academic".to_string(),
                content: "Recent advances...".to_string(),
                citations: "https://example.org".to_string(),
                model: "sonar".to_string(),
            }),
            chunks: vec![ScoredChunk {
                id: "d_chunk_0".to_string(),
                document_id: "d".to_string(),
                chunk_index: 0,
                text: "Local notes on attention.".to_string(),
                file_name: "notes.pdf".to_string(),
                score: 0.9,
            }],
            sources_count: 3,
        }
    }

    #[test]
    fn sources_cover_papers_web_and_documents() {
        let sources = extract_sources(&findings());
        assert!(sources.contains(&"http://arxiv.org/pdf/1706.03762".to_string()));
        assert!(sources.contains(&"https://example.org".to_string()));
        assert!(sources.contains(&"notes.pdf".to_string()));
    }

    #[test]
    fn placeholder_citations_are_not_sources() {
        let mut f = findings();
        f.web.as_mut().unwrap().citations = "No citations available".to_string();
        let sources = extract_sources(&f);
        assert!(!sources.contains(&"No citations available".to_string()));
    }

    #[test]
    fn context_sections_appear_when_present() {
        let context = format_research_context(&findings());
        assert!(context.contains("=== ARXIV PAPERS ==="));
        assert!(context.contains("=== WEB SEARCH RESULTS ==="));
        assert!(context.contains("=== USER DOCUMENTS ==="));
    }

    #[test]
    fn empty_findings_note_the_absence() {
        let context = format_research_context(&ResearchFindings::default());
        assert!(context.contains("No research material"));
    }
}
