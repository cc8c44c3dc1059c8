//! Knowledge base management endpoints.

use axum::Json;
use axum::extract::{Multipart, State};
use serde_json::{Value, json};
use tw_knowledge::{KnowledgeError, SourceDocument, extract_pdf_text};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Multipart field carrying the uploaded document.
const UPLOAD_FIELD: &str = "file";

/// POST /api/initialize-knowledge-base/ — rebuild the index from the
/// configured directory of `.txt` files.
pub async fn initialize(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let chunks = state.knowledge.initialize_from_dir(&state.knowledge_dir).await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Knowledge base initialized successfully",
        "chunks": chunks,
    })))
}

/// POST /api/upload-pdf/ — extract a PDF's text and add it to the index.
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<Value>> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest(format!("missing '{UPLOAD_FIELD}' field")))?;
    if !file_name.to_ascii_lowercase().ends_with(".pdf") {
        return Err(ApiError::BadRequest("only PDF files are supported".into()));
    }

    let text = tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| ApiError::Internal(format!("pdf extraction task failed: {e}")))??;

    let chunks = match state
        .knowledge
        .add_document(SourceDocument::new(file_name.clone(), text))
        .await
    {
        Ok(chunks) => chunks,
        Err(KnowledgeError::Empty(_)) => {
            return Err(ApiError::BadRequest(format!("{file_name} contains no extractable text")));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(file = %file_name, chunks, "pdf added to knowledge base");
    Ok(Json(json!({
        "status": "success",
        "message": format!("{file_name} uploaded and indexed"),
        "chunks": chunks,
    })))
}
