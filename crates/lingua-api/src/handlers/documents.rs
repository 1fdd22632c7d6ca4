//! Study-document handlers.
//!
//! Uploads accept plain text (UTF-8) only; the stored content is what
//! document-mode chats splice into their system prompt.

use axum::extract::{Multipart, Path, State};
use axum::Json;
use uuid::Uuid;

use lingua_core::{DocumentRepository, Error};

use crate::{ApiError, AppState};

pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let mut filename = None;
    let mut content = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            filename = field.file_name().map(|n| n.to_string());
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(format!("Read error: {}", e)))?;
            let text = String::from_utf8(bytes.to_vec()).map_err(|_| {
                ApiError::BadRequest("Document must be UTF-8 text".to_string())
            })?;
            content = Some(text);
        }
    }

    let content = content
        .ok_or_else(|| ApiError::BadRequest("Missing file in multipart form".to_string()))?;
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("Document is empty".to_string()));
    }
    let filename = filename.unwrap_or_else(|| "document.txt".to_string());

    let document = state.db.documents.insert(&filename, &content).await?;
    Ok(Json(serde_json::to_value(document).map_err(Error::from)?))
}

pub async fn list_documents(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let documents = state.db.documents.list().await?;
    Ok(Json(serde_json::json!({ "documents": documents })))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let document = state
        .db
        .documents
        .get(id)
        .await?
        .ok_or(Error::DocumentNotFound(id))?;
    Ok(Json(serde_json::to_value(document).map_err(Error::from)?))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .documents
        .get(id)
        .await?
        .ok_or(Error::DocumentNotFound(id))?;
    state.db.documents.delete(id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
