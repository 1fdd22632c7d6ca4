//! Category handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use lingua_core::{CategoryKind, CategoryRepository, Error};

use crate::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryBody {
    pub name: String,
    pub kind: CategoryKind,
}

pub async fn create_category(
    State(state): State<AppState>,
    Json(body): Json<CreateCategoryBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Category name must not be empty".to_string()));
    }
    let category = state.db.categories.insert(&body.name, body.kind).await?;
    Ok(Json(serde_json::to_value(category).map_err(Error::from)?))
}

pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let categories = state.db.categories.list().await?;
    Ok(Json(serde_json::json!({ "categories": categories })))
}

pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .db
        .categories
        .get(id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("Category {}", id)))?;
    state.db.categories.delete(id).await?;
    Ok(Json(serde_json::json!({ "status": "deleted" })))
}
