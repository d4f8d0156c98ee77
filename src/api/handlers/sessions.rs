use crate::{
    types::{ConversationTurn, Result, SessionInfo},
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct CreateSessionParams {
    #[serde(default = "default_title")]
    pub title: String,
}

fn default_title() -> String {
    "New Research Session".to_string()
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_session_limit")]
    pub limit: usize,
}

fn default_session_limit() -> usize {
    20
}

#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    #[serde(default = "default_history_limit")]
    pub limit: usize,
}

fn default_history_limit() -> usize {
    50
}

/// Create a new research session.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/create",
    params(
        ("title" = Option<String>, Query, description = "Session title")
    ),
    responses(
        (status = 200, description = "Session created")
    ),
    tag = "sessions"
)]
pub async fn create_session(
    State(state): State<AppState>,
    Query(params): Query<CreateSessionParams>,
) -> Result<Json<serde_json::Value>> {
    let session_id = state.memory.create_session(&params.title).await?;

    Ok(Json(serde_json::json!({
        "session_id": session_id,
        "message": "Session created successfully"
    })))
}

/// List all sessions, most recently updated first.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/list",
    params(
        ("limit" = Option<usize>, Query, description = "Maximum number of sessions")
    ),
    responses(
        (status = 200, description = "Session list", body = Vec<SessionInfo>)
    ),
    tag = "sessions"
)]
pub async fn list_sessions(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<SessionInfo>>> {
    let limit = params.limit.clamp(1, 100);
    let sessions = state
        .store
        .list_sessions(state.memory.user_id(), limit)
        .await?;

    let infos = sessions
        .into_iter()
        .map(|s| SessionInfo {
            session_id: s.id,
            title: s.title,
            created_at: s.created_at,
            updated_at: s.updated_at,
            is_active: s.is_active,
            message_count: s.message_count,
        })
        .collect();

    Ok(Json(infos))
}

/// Get conversation history for a session.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/{session_id}/history",
    params(
        ("session_id" = String, Path, description = "Session identifier"),
        ("limit" = Option<usize>, Query, description = "Maximum number of messages")
    ),
    responses(
        (status = 200, description = "Conversation history"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn get_session_history(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>> {
    if state.store.get_session(&session_id).await?.is_none() {
        return Err(crate::types::AppError::NotFound(format!(
            "Session not found: {}",
            session_id
        )));
    }

    let limit = params.limit.clamp(1, 200);
    let messages: Vec<ConversationTurn> = state
        .memory
        .get_session_history(&session_id, limit)
        .await?;

    Ok(Json(serde_json::json!({
        "session_id": session_id,
        "message_count": messages.len(),
        "messages": messages,
    })))
}

/// Activate a specific session, deactivating the rest.
#[utoipa::path(
    post,
    path = "/api/v1/sessions/{session_id}/activate",
    params(
        ("session_id" = String, Path, description = "Session to activate")
    ),
    responses(
        (status = 200, description = "Session activated"),
        (status = 404, description = "Session not found")
    ),
    tag = "sessions"
)]
pub async fn activate_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.store.activate_session(&session_id).await?;

    Ok(Json(serde_json::json!({
        "message": format!("Session {} activated successfully", session_id)
    })))
}

/// Get the current active session, creating one if none exists.
#[utoipa::path(
    get,
    path = "/api/v1/sessions/active",
    responses(
        (status = 200, description = "Active session")
    ),
    tag = "sessions"
)]
pub async fn get_active_session(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>> {
    let session_id = state.memory.get_active_session().await?;

    Ok(Json(serde_json::json!({
        "session_id": session_id,
        "is_active": true
    })))
}
