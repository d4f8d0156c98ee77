use crate::{
    types::{Paper, Result, ScoredChunk, WebSearchResult},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ArxivParams {
    pub query: String,
    #[serde(default = "default_arxiv_results")]
    pub max_results: usize,
}

fn default_arxiv_results() -> usize {
    10
}

#[derive(Debug, Deserialize)]
pub struct WebParams {
    pub query: String,
    #[serde(default = "default_focus")]
    pub focus: String,
}

fn default_focus() -> String {
    "internet".to_string()
}

#[derive(Debug, Deserialize)]
pub struct SemanticParams {
    pub query: String,
    #[serde(default = "default_semantic_limit")]
    pub limit: usize,
    pub document_id: Option<String>,
}

fn default_semantic_limit() -> usize {
    5
}

/// Search for papers on arXiv.
#[utoipa::path(
    get,
    path = "/api/v1/search/arxiv",
    params(
        ("query" = String, Query, description = "Search query for arXiv papers"),
        ("max_results" = Option<usize>, Query, description = "Maximum number of results (1-50)")
    ),
    responses(
        (status = 200, description = "Paper list", body = Vec<Paper>),
        (status = 502, description = "arXiv unavailable")
    ),
    tag = "search"
)]
pub async fn search_arxiv(
    State(state): State<AppState>,
    Query(params): Query<ArxivParams>,
) -> Result<Json<Vec<Paper>>> {
    let papers = state.arxiv.search(&params.query, params.max_results).await?;
    tracing::info!("arXiv search completed: {}", params.query);
    Ok(Json(papers))
}

/// Get a specific paper by arXiv ID.
#[utoipa::path(
    get,
    path = "/api/v1/search/arxiv/{arxiv_id}",
    params(
        ("arxiv_id" = String, Path, description = "The arXiv ID, e.g. 2301.12345")
    ),
    responses(
        (status = 200, description = "Paper details", body = Paper),
        (status = 404, description = "Paper not found")
    ),
    tag = "search"
)]
pub async fn get_arxiv_paper(
    State(state): State<AppState>,
    Path(arxiv_id): Path<String>,
) -> Result<Json<Paper>> {
    let paper = state.arxiv.get_by_id(&arxiv_id).await?;
    tracing::info!("Retrieved arXiv paper: {}", arxiv_id);
    Ok(Json(paper))
}

/// Search the web via Perplexity.
#[utoipa::path(
    get,
    path = "/api/v1/search/web",
    params(
        ("query" = String, Query, description = "Search query"),
        ("focus" = Option<String>, Query, description = "Search focus: internet, academic, general")
    ),
    responses(
        (status = 200, description = "Search result with citations", body = WebSearchResult),
        (status = 502, description = "Perplexity unavailable")
    ),
    tag = "search"
)]
pub async fn search_web(
    State(state): State<AppState>,
    Query(params): Query<WebParams>,
) -> Result<Json<WebSearchResult>> {
    let result = state.web.search_with_focus(&params.query, &params.focus).await?;
    tracing::info!("Web search completed: {}", params.query);
    Ok(Json(result))
}

/// Semantic search over the user's uploaded documents.
#[utoipa::path(
    get,
    path = "/api/v1/search/semantic",
    params(
        ("query" = String, Query, description = "Semantic search query"),
        ("limit" = Option<usize>, Query, description = "Maximum number of results (1-20)"),
        ("document_id" = Option<String>, Query, description = "Restrict to one document")
    ),
    responses(
        (status = 200, description = "Scored chunks", body = Vec<ScoredChunk>)
    ),
    tag = "search"
)]
pub async fn semantic_search(
    State(state): State<AppState>,
    Query(params): Query<SemanticParams>,
) -> Result<Json<Vec<ScoredChunk>>> {
    let limit = params.limit.clamp(1, 20);
    let embedding = state.embedder.embed_one(&params.query)?;

    let results = state
        .vectors
        .search(&embedding, limit, 0.0, params.document_id.as_deref())
        .await?;

    tracing::info!("Semantic search completed: {}", params.query);
    Ok(Json(results))
}
