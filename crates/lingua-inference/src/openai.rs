//! OpenAI-compatible chat translation.
//!
//! Messages are posted verbatim to `/v1/chat/completions` with bearer-token
//! auth when a key resolves. A missing key is tolerated; the upstream
//! rejects it if it actually requires one.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lingua_core::{ChatTurn, Error, Result};

use crate::provider::ProviderSettings;

#[derive(Serialize)]
struct WireMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub(crate) async fn invoke(
    client: &Client,
    settings: &ProviderSettings,
    turns: &[ChatTurn],
) -> Result<String> {
    let request = ChatCompletionRequest {
        model: &settings.model,
        messages: turns
            .iter()
            .map(|t| WireMessage {
                role: t.role.to_string(),
                content: &t.content,
            })
            .collect(),
    };

    let url = format!(
        "{}/v1/chat/completions",
        settings.base_url.trim_end_matches('/')
    );
    let mut req = client.post(&url).json(&request);
    if let Some(key) = settings.resolve_api_key() {
        req = req.header("Authorization", format!("Bearer {}", key));
    }

    let response = req.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or(body);
        return Err(Error::Upstream(format!(
            "OpenAI returned {}: {}",
            status, detail
        )));
    }

    let result: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Failed to parse OpenAI response: {}", e)))?;

    let content = result
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .unwrap_or_default();

    debug!(
        subsystem = "inference",
        component = "openai",
        op = "complete",
        model = %settings.model,
        response_len = content.len(),
        "Completion finished"
    );
    Ok(content)
}
