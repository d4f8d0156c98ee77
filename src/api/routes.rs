use crate::AppState;
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// The route table. Single-user mode: no authentication layer.
pub fn create_router() -> Router<AppState> {
    Router::new()
        // Health
        .route("/health", get(crate::api::handlers::health::health_check))
        .route(
            "/api/v1/status/services",
            get(crate::api::handlers::health::check_services),
        )
        // Research
        .route(
            "/api/v1/research/query",
            post(crate::api::handlers::research::process_research_query),
        )
        .route(
            "/api/v1/research/quick-answer",
            post(crate::api::handlers::research::quick_answer),
        )
        // Sessions
        .route(
            "/api/v1/sessions/create",
            post(crate::api::handlers::sessions::create_session),
        )
        .route(
            "/api/v1/sessions/list",
            get(crate::api::handlers::sessions::list_sessions),
        )
        .route(
            "/api/v1/sessions/active",
            get(crate::api::handlers::sessions::get_active_session),
        )
        .route(
            "/api/v1/sessions/{session_id}/history",
            get(crate::api::handlers::sessions::get_session_history),
        )
        .route(
            "/api/v1/sessions/{session_id}/activate",
            post(crate::api::handlers::sessions::activate_session),
        )
        // Documents
        .route(
            "/api/v1/documents/upload",
            post(crate::api::handlers::documents::upload_document),
        )
        .route(
            "/api/v1/documents/list",
            get(crate::api::handlers::documents::list_documents),
        )
        .route(
            "/api/v1/documents/{document_id}",
            delete(crate::api::handlers::documents::delete_document),
        )
        .route(
            "/api/v1/documents/{document_id}/chunks",
            get(crate::api::handlers::documents::get_document_chunks),
        )
        // Search
        .route(
            "/api/v1/search/arxiv",
            get(crate::api::handlers::search::search_arxiv),
        )
        .route(
            "/api/v1/search/arxiv/{arxiv_id}",
            get(crate::api::handlers::search::get_arxiv_paper),
        )
        .route(
            "/api/v1/search/web",
            get(crate::api::handlers::search::search_web),
        )
        .route(
            "/api/v1/search/semantic",
            get(crate::api::handlers::search::semantic_search),
        )
}

/// The finished application: routes, middleware, and state.
pub fn app(state: AppState) -> Router {
    // One extra MB of headroom for multipart framing around the file itself
    let body_limit = state.config.max_upload_size_bytes() + 1024 * 1024;

    create_router()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
