//! Store-level tests: users, sessions, turns, and document lifecycle.

use aria::types::{ConversationTurn, DocumentRecord, DocumentStatus, MessageRole};
use aria::StoreClient;
use chrono::Utc;

async fn store_with_user() -> StoreClient {
    let store = StoreClient::new_memory().await.expect("store");
    store
        .ensure_user("default_user", "default_user")
        .await
        .expect("user");
    store
}

fn turn(session_id: &str, role: MessageRole, content: &str) -> ConversationTurn {
    ConversationTurn {
        id: uuid::Uuid::new_v4().to_string(),
        session_id: session_id.to_string(),
        role,
        content: content.to_string(),
        timestamp: Utc::now(),
        agent: String::new(),
        sources: vec![],
        processing_time: 0.0,
    }
}

fn document(id: &str) -> DocumentRecord {
    DocumentRecord {
        id: id.to_string(),
        user_id: "default_user".to_string(),
        file_name: "notes.txt".to_string(),
        file_path: format!("/tmp/{}.txt", id),
        file_type: "text".to_string(),
        file_size_bytes: 42,
        extraction_method: String::new(),
        status: DocumentStatus::Pending,
        chunk_count: 0,
        error: None,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn ensure_user_is_idempotent() {
    let store = store_with_user().await;
    store
        .ensure_user("default_user", "default_user")
        .await
        .expect("second ensure");

    let user = store.get_user("default_user").await.unwrap().unwrap();
    assert_eq!(user.id, "default_user");
    assert_eq!(user.total_sessions, 0);
}

#[tokio::test]
async fn session_counters_track_creates() {
    let store = store_with_user().await;
    store
        .create_session("s1", "default_user", "First")
        .await
        .unwrap();
    store
        .create_session("s2", "default_user", "Second")
        .await
        .unwrap();

    let user = store.get_user("default_user").await.unwrap().unwrap();
    assert_eq!(user.total_sessions, 2);
}

#[tokio::test]
async fn activate_session_is_exclusive() {
    let store = store_with_user().await;
    store
        .create_session("s1", "default_user", "First")
        .await
        .unwrap();
    store
        .create_session("s2", "default_user", "Second")
        .await
        .unwrap();

    store.activate_session("s1").await.unwrap();

    let s1 = store.get_session("s1").await.unwrap().unwrap();
    let s2 = store.get_session("s2").await.unwrap().unwrap();
    assert!(s1.is_active);
    assert!(!s2.is_active);

    let active = store.get_active_session_id("default_user").await.unwrap();
    assert_eq!(active.as_deref(), Some("s1"));
}

#[tokio::test]
async fn activating_unknown_session_is_not_found() {
    let store = store_with_user().await;
    let result = store.activate_session("missing").await;
    assert!(matches!(result, Err(aria::AppError::NotFound(_))));
}

#[tokio::test]
async fn turns_are_appended_and_returned_in_order() {
    let store = store_with_user().await;
    store
        .create_session("s1", "default_user", "Session")
        .await
        .unwrap();

    store
        .add_turn(&turn("s1", MessageRole::User, "What is attention?"))
        .await
        .unwrap();
    store
        .add_turn(&turn("s1", MessageRole::Assistant, "A weighting mechanism."))
        .await
        .unwrap();
    store
        .add_turn(&turn("s1", MessageRole::User, "And self-attention?"))
        .await
        .unwrap();

    let history = store.get_session_history("s1", 10).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].content, "What is attention?");
    assert_eq!(history[1].role, MessageRole::Assistant);

    // Timestamps non-decreasing in returned order
    for pair in history.windows(2) {
        assert!(pair[0].timestamp <= pair[1].timestamp);
    }

    // Session counters moved with each turn
    let session = store.get_session("s1").await.unwrap().unwrap();
    assert_eq!(session.message_count, 3);
    assert!(session.updated_at >= session.created_at);
}

#[tokio::test]
async fn history_limit_returns_most_recent_turns() {
    let store = store_with_user().await;
    store
        .create_session("s1", "default_user", "Session")
        .await
        .unwrap();

    for i in 0..6 {
        store
            .add_turn(&turn("s1", MessageRole::User, &format!("q{}", i)))
            .await
            .unwrap();
    }

    let history = store.get_session_history("s1", 2).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].content, "q4");
    assert_eq!(history[1].content, "q5");
}

#[tokio::test]
async fn turn_sources_round_trip() {
    let store = store_with_user().await;
    store
        .create_session("s1", "default_user", "Session")
        .await
        .unwrap();

    let mut t = turn("s1", MessageRole::Assistant, "Answer");
    t.agent = "analyst".to_string();
    t.sources = vec!["http://arxiv.org/pdf/1".to_string(), "notes.pdf".to_string()];
    t.processing_time = 1.25;
    store.add_turn(&t).await.unwrap();

    let history = store.get_session_history("s1", 1).await.unwrap();
    assert_eq!(history[0].agent, "analyst");
    assert_eq!(history[0].sources.len(), 2);
    assert!((history[0].processing_time - 1.25).abs() < f64::EPSILON);
}

#[tokio::test]
async fn document_status_lifecycle() {
    let store = store_with_user().await;
    store.create_document(&document("d1")).await.unwrap();

    let doc = store.get_document("d1").await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Pending);

    store
        .set_document_status("d1", DocumentStatus::Processing)
        .await
        .unwrap();
    let doc = store.get_document("d1").await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Processing);

    store.finish_document("d1", 7, "utf8").await.unwrap();
    let doc = store.get_document("d1").await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Done);
    assert_eq!(doc.chunk_count, 7);
    assert_eq!(doc.extraction_method, "utf8");
    assert!(doc.error.is_none());
}

#[tokio::test]
async fn failed_documents_record_the_error() {
    let store = store_with_user().await;
    store.create_document(&document("d1")).await.unwrap();
    store
        .fail_document("d1", "no extractable text")
        .await
        .unwrap();

    let doc = store.get_document("d1").await.unwrap().unwrap();
    assert_eq!(doc.status, DocumentStatus::Failed);
    assert_eq!(doc.error.as_deref(), Some("no extractable text"));
}

#[tokio::test]
async fn document_delete_and_counters() {
    let store = store_with_user().await;
    store.create_document(&document("d1")).await.unwrap();
    store.create_document(&document("d2")).await.unwrap();

    let user = store.get_user("default_user").await.unwrap().unwrap();
    assert_eq!(user.total_documents, 2);

    store.delete_document("d1").await.unwrap();
    assert!(store.get_document("d1").await.unwrap().is_none());

    let remaining = store.list_documents("default_user", 10).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, "d2");
}
