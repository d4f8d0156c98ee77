use crate::{
    types::{
        QuickAnswerRequest, QuickAnswerResponse, ResearchQueryRequest, ResearchQueryResponse,
        Result,
    },
    AppState,
};
use axum::{extract::State, Json};

/// Confidence reported with pipeline answers. A scoring model is not part of
/// the pipeline; this is a fixed placeholder.
const PIPELINE_CONFIDENCE: f32 = 0.85;

/// Process a research query through the multi-agent pipeline.
#[utoipa::path(
    post,
    path = "/api/v1/research/query",
    request_body = ResearchQueryRequest,
    responses(
        (status = 200, description = "Research completed", body = ResearchQueryResponse),
        (status = 400, description = "Invalid input"),
        (status = 500, description = "Pipeline failure")
    ),
    tag = "research"
)]
pub async fn process_research_query(
    State(state): State<AppState>,
    Json(payload): Json<ResearchQueryRequest>,
) -> Result<Json<ResearchQueryResponse>> {
    if payload.query.trim().is_empty() {
        return Err(crate::types::AppError::InvalidInput(
            "Query must not be empty".to_string(),
        ));
    }

    tracing::info!("Received research query: {}", payload.query);

    let orchestrator = state.orchestrator();
    let outcome = orchestrator
        .process_query(&payload.query, payload.session_id)
        .await?;

    Ok(Json(ResearchQueryResponse {
        answer: outcome.answer,
        sources: outcome.sources,
        processing_time: outcome.processing_time,
        confidence: PIPELINE_CONFIDENCE,
        session_id: outcome.session_id,
    }))
}

/// Get a quick answer without the full research workflow.
///
/// Uses a single LLM call, no retrieval, and persists nothing.
#[utoipa::path(
    post,
    path = "/api/v1/research/quick-answer",
    request_body = QuickAnswerRequest,
    responses(
        (status = 200, description = "Quick answer", body = QuickAnswerResponse),
        (status = 500, description = "LLM failure")
    ),
    tag = "research"
)]
pub async fn quick_answer(
    State(state): State<AppState>,
    Json(payload): Json<QuickAnswerRequest>,
) -> Result<Json<QuickAnswerResponse>> {
    let answer = state.llm.generate(&payload.query).await?;

    Ok(Json(QuickAnswerResponse {
        answer,
        answer_type: "quick".to_string(),
        sources: vec![],
    }))
}
