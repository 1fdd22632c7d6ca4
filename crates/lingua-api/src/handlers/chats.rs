//! Chat CRUD and message-sending handlers.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lingua_core::{ChatMode, CreateChatRequest, ListChatsRequest};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateChatBody {
    pub title: String,
    pub mode: ChatMode,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub document_id: Option<Uuid>,
}

pub async fn create_chat(
    State(state): State<AppState>,
    Json(body): Json<CreateChatBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let chat = state
        .chats
        .create_chat(CreateChatRequest {
            title: body.title,
            mode: body.mode,
            category_id: body.category_id,
            document_id: body.document_id,
        })
        .await?;
    Ok(Json(serde_json::to_value(chat).map_err(lingua_core::Error::from)?))
}

#[derive(Debug, Deserialize)]
pub struct ListChatsQuery {
    #[serde(default)]
    pub mode: Option<ChatMode>,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

pub async fn list_chats(
    State(state): State<AppState>,
    Query(query): Query<ListChatsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let chats = state
        .chats
        .list_chats(ListChatsRequest {
            mode: query.mode,
            category_id: query.category_id,
        })
        .await?;
    Ok(Json(serde_json::json!({ "chats": chats })))
}

pub async fn get_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (chat, messages) = state.chats.get_chat(id).await?;
    Ok(Json(serde_json::json!({
        "chat": chat,
        "messages": messages,
    })))
}

pub async fn delete_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.chats.delete_chat(id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct SendMessageBody {
    pub content: String,
    #[serde(default = "default_detect_grammar")]
    pub detect_grammar: bool,
}

fn default_detect_grammar() -> bool {
    true
}

pub async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SendMessageBody>,
) -> Result<Json<lingua_chat::SendMessageResult>, ApiError> {
    if body.content.trim().is_empty() {
        return Err(ApiError::BadRequest("Message content must not be empty".to_string()));
    }
    let result = state
        .chats
        .send_message(id, body.content, body.detect_grammar)
        .await?;
    Ok(Json(result))
}
