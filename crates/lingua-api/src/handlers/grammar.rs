//! Grammar-rule handlers.
//!
//! Creating a rule also provisions the learning setup the frontend jumps
//! into: a grammar category named after the rule (find-or-create) and a
//! grammar-mode chat for practicing it.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lingua_core::{
    CategoryKind, CategoryRepository, ChatMode, ChatRepository, CreateChatRequest,
    CreateGrammarRuleRequest, Error, GrammarRuleRepository,
};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateGrammarRuleBody {
    pub rule_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub examples: Option<String>,
    /// Chat in which the rule was detected, if any.
    #[serde(default)]
    pub from_chat_id: Option<Uuid>,
}

pub async fn create_grammar_rule(
    State(state): State<AppState>,
    Json(body): Json<CreateGrammarRuleBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let name = body.rule_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("Rule name must not be empty".to_string()));
    }

    let category = match state
        .db
        .categories
        .find_by_name(name, CategoryKind::Grammar)
        .await?
    {
        Some(existing) => existing,
        None => state.db.categories.insert(name, CategoryKind::Grammar).await?,
    };

    let chat = state
        .db
        .chats
        .insert(CreateChatRequest {
            title: format!("Learning: {}", name),
            mode: ChatMode::Grammar,
            category_id: Some(category.id),
            document_id: None,
        })
        .await?;

    let rule = state
        .db
        .grammar_rules
        .insert(CreateGrammarRuleRequest {
            name: name.to_string(),
            description: body.description,
            examples: body.examples,
            chat_id: Some(chat.id),
        })
        .await?;

    Ok(Json(serde_json::json!({
        "rule_id": rule.id,
        "chat_id": chat.id,
        "category_id": category.id,
    })))
}

pub async fn list_grammar_rules(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let rules = state.db.grammar_rules.list().await?;
    Ok(Json(serde_json::json!({ "rules": rules })))
}

pub async fn delete_grammar_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .grammar_rules
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Grammar rule {}", id)))?;
    state.db.grammar_rules.delete(id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
