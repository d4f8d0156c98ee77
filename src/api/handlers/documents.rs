use crate::{
    types::{AppError, DocumentInfo, DocumentProcessingStatus, DocumentStatus, Result},
    AppState,
};
use axum::{
    extract::{Multipart, Path, State},
    Json,
};

const DOCUMENT_LIST_LIMIT: usize = 100;

/// Upload and process a document (PDF or plain text).
///
/// The document is stored, chunked, embedded, and indexed before the
/// response returns; its status reflects the outcome.
#[utoipa::path(
    post,
    path = "/api/v1/documents/upload",
    responses(
        (status = 200, description = "Document processed", body = DocumentProcessingStatus),
        (status = 400, description = "Unsupported format or size limit exceeded")
    ),
    tag = "documents"
)]
pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentProcessingStatus>> {
    let mut file_name = String::new();
    let mut bytes: Vec<u8> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().unwrap_or_default().to_string();
            bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidInput(format!("Failed to read upload: {}", e)))?
                .to_vec();
        }
    }

    if file_name.is_empty() {
        return Err(AppError::InvalidInput("No file provided".to_string()));
    }

    let outcome = state.documents.ingest(&file_name, &bytes).await?;

    Ok(Json(DocumentProcessingStatus {
        document_id: outcome.document_id,
        file_name,
        status: DocumentStatus::Done,
        message: format!(
            "Document processed successfully. Created {} chunks.",
            outcome.chunk_count
        ),
        chunk_count: outcome.chunk_count,
    }))
}

/// List all documents for the user.
#[utoipa::path(
    get,
    path = "/api/v1/documents/list",
    responses(
        (status = 200, description = "Document list", body = Vec<DocumentInfo>)
    ),
    tag = "documents"
)]
pub async fn list_documents(State(state): State<AppState>) -> Result<Json<Vec<DocumentInfo>>> {
    let documents = state
        .store
        .list_documents(state.memory.user_id(), DOCUMENT_LIST_LIMIT)
        .await?;

    let infos = documents
        .into_iter()
        .map(|d| DocumentInfo {
            document_id: d.id,
            file_name: d.file_name,
            file_type: d.file_type,
            file_size_bytes: d.file_size_bytes,
            status: d.status,
            chunk_count: d.chunk_count,
            created_at: d.created_at,
        })
        .collect();

    Ok(Json(infos))
}

/// Delete a document, its stored file, and its embedding records.
#[utoipa::path(
    delete,
    path = "/api/v1/documents/{document_id}",
    params(
        ("document_id" = String, Path, description = "Document to delete")
    ),
    responses(
        (status = 200, description = "Document deleted"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents"
)]
pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state.documents.delete(&document_id).await?;

    Ok(Json(serde_json::json!({
        "message": format!("Document {} deleted successfully", document_id)
    })))
}

/// Get all chunks for a document, ordered by chunk index.
#[utoipa::path(
    get,
    path = "/api/v1/documents/{document_id}/chunks",
    params(
        ("document_id" = String, Path, description = "Document identifier")
    ),
    responses(
        (status = 200, description = "Document chunks"),
        (status = 404, description = "Document not found")
    ),
    tag = "documents"
)]
pub async fn get_document_chunks(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    if state.store.get_document(&document_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Document not found: {}",
            document_id
        )));
    }

    let chunks = state.vectors.chunks_for_document(&document_id).await?;

    Ok(Json(serde_json::json!({
        "document_id": document_id,
        "chunk_count": chunks.len(),
        "chunks": chunks,
    })))
}
