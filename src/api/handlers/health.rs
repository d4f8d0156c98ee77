use crate::{types::Result, AppState};
use axum::{extract::State, Json};
use chrono::Utc;

/// Check if the service is healthy.
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "health"
)]
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "service": "research-assistant"
    }))
}

/// Check status of all backing services.
#[utoipa::path(
    get,
    path = "/api/v1/status/services",
    responses(
        (status = 200, description = "Component statuses")
    ),
    tag = "health"
)]
pub async fn check_services(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    // A cheap query per component doubles as a liveness probe
    let store_status = match state.store.get_user(&state.config.user_id).await {
        Ok(_) => "connected",
        Err(_) => "error",
    };
    let vector_status = match state.vectors.count().await {
        Ok(_) => "connected",
        Err(_) => "error",
    };

    Ok(Json(serde_json::json!({
        "store": store_status,
        "vector_store": vector_status,
        "vector_backend": state.vectors.provider_name(),
        "embedding_model": state.embedder.model_name(),
        "llm_model": state.llm.model_name(),
        "timestamp": Utc::now().to_rfc3339(),
    })))
}
