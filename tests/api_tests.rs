//! HTTP API tests over the full router with mocked LLM and search backends.

mod common;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use common::mocks::{MockLLMClient, ARXIV_FEED, PERPLEXITY_RESPONSE};
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestContext {
    server: TestServer,
    _upload_dir: tempfile::TempDir,
    _arxiv: MockServer,
    _web: MockServer,
}

async fn setup(route: &str) -> TestContext {
    let arxiv = MockServer::start().await;
    let web = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/query"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ARXIV_FEED))
        .mount(&arxiv)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(PERPLEXITY_RESPONSE)
                .insert_header("content-type", "application/json"),
        )
        .mount(&web)
        .await;

    let llm = Arc::new(MockLLMClient::routing(route));
    let upload_dir = tempfile::tempdir().expect("tempdir");
    let state = common::mocks::test_state(
        llm,
        &arxiv.uri(),
        &web.uri(),
        upload_dir.path().to_str().unwrap(),
    )
    .await;

    TestContext {
        server: TestServer::new(aria::api::app(state)).expect("server"),
        _upload_dir: upload_dir,
        _arxiv: arxiv,
        _web: web,
    }
}

fn text_part(content: &str, file_name: &str) -> Part {
    Part::bytes(content.as_bytes().to_vec())
        .file_name(file_name.to_string())
        .mime_type("text/plain")
}

// ============= Health =============

#[tokio::test]
async fn health_check_reports_healthy() {
    let ctx = setup("research").await;

    let response = ctx.server.get("/health").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "research-assistant");
}

#[tokio::test]
async fn service_status_lists_components() {
    let ctx = setup("research").await;

    let response = ctx.server.get("/api/v1/status/services").await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["store"], "connected");
    assert_eq!(body["vector_backend"], "embedded");
    assert_eq!(body["llm_model"], "mock-llm");
}

// ============= Sessions =============

#[tokio::test]
async fn sessions_can_be_created_listed_and_activated() {
    let ctx = setup("research").await;

    let created = ctx
        .server
        .post("/api/v1/sessions/create")
        .add_query_param("title", "Transformers")
        .await;
    created.assert_status(StatusCode::OK);
    let first: Value = created.json();
    let first_id = first["session_id"].as_str().unwrap().to_string();

    let created = ctx.server.post("/api/v1/sessions/create").await;
    let second: Value = created.json();
    let second_id = second["session_id"].as_str().unwrap().to_string();
    assert_ne!(first_id, second_id);

    // Latest created session is the active one
    let active: Value = ctx.server.get("/api/v1/sessions/active").await.json();
    assert_eq!(active["session_id"], second_id.as_str());

    // Activate the first again
    let response = ctx
        .server
        .post(&format!("/api/v1/sessions/{}/activate", first_id))
        .await;
    response.assert_status(StatusCode::OK);

    let active: Value = ctx.server.get("/api/v1/sessions/active").await.json();
    assert_eq!(active["session_id"], first_id.as_str());

    let sessions: Vec<Value> = ctx.server.get("/api/v1/sessions/list").await.json();
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn history_of_unknown_session_is_not_found() {
    let ctx = setup("research").await;

    let response = ctx.server.get("/api/v1/sessions/missing/history").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn activating_unknown_session_is_not_found() {
    let ctx = setup("research").await;

    let response = ctx.server.post("/api/v1/sessions/missing/activate").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============= Research =============

#[tokio::test]
async fn research_query_returns_answer_with_citations() {
    let ctx = setup("research").await;

    let response = ctx
        .server
        .post("/api/v1/research/query")
        .json(&json!({"query": "What are the latest advances in transformer models?"}))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["answer"], "Final analysis answering the question [1].");
    assert!((body["confidence"].as_f64().unwrap() - 0.85).abs() < 1e-6);
    assert!(!body["sources"].as_array().unwrap().is_empty());
    assert!(body["session_id"].as_str().unwrap().starts_with("session_"));

    // The exchange is visible in session history
    let session_id = body["session_id"].as_str().unwrap();
    let history: Value = ctx
        .server
        .get(&format!("/api/v1/sessions/{}/history", session_id))
        .await
        .json();
    assert_eq!(history["message_count"], 2);
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let ctx = setup("research").await;

    let response = ctx
        .server
        .post("/api/v1/research/query")
        .json(&json!({"query": "   "}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("empty"));
}

#[tokio::test]
async fn quick_answer_skips_the_pipeline() {
    let ctx = setup("research").await;

    let response = ctx
        .server
        .post("/api/v1/research/quick-answer")
        .json(&json!({"query": "What is 2+2?"}))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["answer"], "A quick answer.");
    assert_eq!(body["type"], "quick");
    assert!(body["sources"].as_array().unwrap().is_empty());
}

// ============= Documents =============

#[tokio::test]
async fn uploaded_document_is_processed_and_searchable() {
    let ctx = setup("research").await;

    let content = "Attention mechanisms weigh token relevance. \
                   Self-attention relates positions within one sequence. \
                   Multi-head attention runs several in parallel."
        .to_string();

    let response = ctx
        .server
        .post("/api/v1/documents/upload")
        .multipart(MultipartForm::new().add_part("file", text_part(&content, "attention.txt")))
        .await;
    response.assert_status(StatusCode::OK);

    let body: Value = response.json();
    assert_eq!(body["status"], "done");
    let chunk_count = body["chunk_count"].as_u64().unwrap();
    assert!(chunk_count >= 1);
    let document_id = body["document_id"].as_str().unwrap().to_string();

    // Listed with done status
    let documents: Vec<Value> = ctx.server.get("/api/v1/documents/list").await.json();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["status"], "done");
    assert_eq!(documents[0]["chunk_count"].as_u64().unwrap(), chunk_count);

    // Chunks are retrievable and ordered
    let chunks: Value = ctx
        .server
        .get(&format!("/api/v1/documents/{}/chunks", document_id))
        .await
        .json();
    assert_eq!(chunks["chunk_count"].as_u64().unwrap(), chunk_count);
    let indices: Vec<u64> = chunks["chunks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["chunk_index"].as_u64().unwrap())
        .collect();
    let mut sorted = indices.clone();
    sorted.sort_unstable();
    assert_eq!(indices, sorted);

    // Semantic search reaches the stored chunks
    let results: Vec<Value> = ctx
        .server
        .get("/api/v1/search/semantic")
        .add_query_param("query", "attention")
        .await
        .json();
    assert!(!results.is_empty());
    assert_eq!(results[0]["file_name"], "attention.txt");
}

#[tokio::test]
async fn unsupported_upload_format_is_rejected() {
    let ctx = setup("research").await;

    let response = ctx
        .server
        .post("/api/v1/documents/upload")
        .multipart(MultipartForm::new().add_part(
            "file",
            Part::bytes(vec![0u8; 16]).file_name("image.png"),
        ))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Unsupported"));
}

#[tokio::test]
async fn oversized_upload_is_rejected() {
    let ctx = setup("research").await;

    // Test config caps uploads at 1MB
    let big = "x".repeat(1024 * 1024 + 1);
    let response = ctx
        .server
        .post("/api/v1/documents/upload")
        .multipart(MultipartForm::new().add_part("file", text_part(&big, "big.txt")))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn deleting_a_document_cascades_to_its_chunks() {
    let ctx = setup("research").await;

    let response = ctx
        .server
        .post("/api/v1/documents/upload")
        .multipart(MultipartForm::new().add_part(
            "file",
            text_part("Some research notes worth indexing.", "notes.txt"),
        ))
        .await;
    let document_id = response.json::<Value>()["document_id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = ctx
        .server
        .delete(&format!("/api/v1/documents/{}", document_id))
        .await;
    response.assert_status(StatusCode::OK);

    // Gone from the list and from the vector store
    let documents: Vec<Value> = ctx.server.get("/api/v1/documents/list").await.json();
    assert!(documents.is_empty());

    let response = ctx
        .server
        .get(&format!("/api/v1/documents/{}/chunks", document_id))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_document_is_not_found() {
    let ctx = setup("research").await;

    let response = ctx.server.delete("/api/v1/documents/missing").await;
    response.assert_status(StatusCode::NOT_FOUND);
}

// ============= Search =============

#[tokio::test]
async fn arxiv_search_returns_parsed_papers() {
    let ctx = setup("research").await;

    let papers: Vec<Value> = ctx
        .server
        .get("/api/v1/search/arxiv")
        .add_query_param("query", "transformers")
        .await
        .json();

    assert_eq!(papers.len(), 1);
    assert_eq!(papers[0]["title"], "Advances in Transformer Models");
    assert_eq!(papers[0]["arxiv_id"], "2301.12345v1");
    assert_eq!(papers[0]["authors"], "Grace Hopper");
}

#[tokio::test]
async fn arxiv_paper_lookup_by_id() {
    let ctx = setup("research").await;

    let paper: Value = ctx
        .server
        .get("/api/v1/search/arxiv/2301.12345v1")
        .await
        .json();
    assert_eq!(paper["title"], "Advances in Transformer Models");
}

#[tokio::test]
async fn web_search_returns_citations() {
    let ctx = setup("research").await;

    let result: Value = ctx
        .server
        .get("/api/v1/search/web")
        .add_query_param("query", "transformers")
        .add_query_param("focus", "academic")
        .await
        .json();

    assert_eq!(result["content"], "Transformers keep improving.");
    assert_eq!(result["focus"], "academic");
    assert!(result["citations"]
        .as_str()
        .unwrap()
        .contains("example.org/transformers"));
}
