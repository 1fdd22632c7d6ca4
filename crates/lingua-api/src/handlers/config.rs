//! Runtime configuration handlers.
//!
//! `GET` never echoes key material; it reports whether a key resolves and
//! where it came from.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use lingua_inference::{ProviderKind, ProviderSettings, WhisperSettings};

use crate::{ApiError, AppState};

fn env_key_present(provider: ProviderKind) -> bool {
    provider
        .api_key_env()
        .and_then(|var| std::env::var(var).ok())
        .map(|k| !k.is_empty())
        .unwrap_or(false)
}

/// Where the active key comes from, in the same precedence
/// `ProviderSettings::resolve_api_key` uses: explicit config key first,
/// then the environment.
fn api_key_source(llm: &ProviderSettings) -> Option<&'static str> {
    if llm.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        Some("config")
    } else if env_key_present(llm.provider) {
        Some("env")
    } else {
        None
    }
}

pub async fn get_config(State(state): State<AppState>) -> Json<serde_json::Value> {
    let llm = state.config.llm().await;
    let whisper = state.config.whisper().await;

    let api_key_source = api_key_source(&llm);

    Json(serde_json::json!({
        "llm": {
            "provider": llm.provider,
            "model": llm.model,
            "base_url": llm.base_url,
            "has_api_key": llm.resolve_api_key().is_some(),
            "api_key_source": api_key_source,
        },
        "whisper": {
            "base_url": whisper.base_url,
            "model": whisper.model,
            "language": whisper.language,
        },
        "env_keys_configured": {
            "openai": env_key_present(ProviderKind::Openai),
            "anthropic": env_key_present(ProviderKind::Anthropic),
            "gemini": env_key_present(ProviderKind::Gemini),
        },
    }))
}

#[derive(Debug, Deserialize)]
pub struct LlmConfigBody {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

pub async fn update_llm_config(
    State(state): State<AppState>,
    Json(body): Json<LlmConfigBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.model.trim().is_empty() && body.provider != ProviderKind::Gemini {
        return Err(ApiError::BadRequest("Model must not be empty".to_string()));
    }

    let has_api_key = body.api_key.as_deref().is_some_and(|k| !k.is_empty());
    let settings = ProviderSettings {
        provider: body.provider,
        model: body.model,
        base_url: body.base_url,
        api_key: body.api_key,
    };
    state.config.replace_llm(settings.clone()).await;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "config": {
            "provider": settings.provider,
            "model": settings.model,
            "base_url": settings.base_url,
            "has_api_key": has_api_key,
        },
    })))
}

#[derive(Debug, Deserialize)]
pub struct WhisperConfigBody {
    pub base_url: String,
    pub model: String,
    pub language: String,
}

pub async fn update_whisper_config(
    State(state): State<AppState>,
    Json(body): Json<WhisperConfigBody>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if body.model.trim().is_empty() {
        return Err(ApiError::BadRequest("Model must not be empty".to_string()));
    }
    let settings = WhisperSettings {
        base_url: body.base_url,
        model: body.model,
        language: body.language,
    };
    state.config.replace_whisper(settings.clone()).await;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "config": settings,
    })))
}
