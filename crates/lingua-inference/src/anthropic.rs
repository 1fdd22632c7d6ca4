//! Anthropic Messages API translation.
//!
//! System-role turns are concatenated into the dedicated `system` field;
//! the remaining user/assistant turns form the message sequence. A key is
//! mandatory — the call fails fast without one.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use lingua_core::{defaults, ChatTurn, Error, MessageRole, Result};

use crate::provider::ProviderSettings;

#[derive(Serialize)]
struct WireMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: String,
    messages: Vec<WireMessage<'a>>,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

/// Split turns into the concatenated system prompt and the chat sequence.
fn partition_turns<'a>(turns: &'a [ChatTurn]) -> (String, Vec<WireMessage<'a>>) {
    let mut system = String::new();
    let mut messages = Vec::new();
    for turn in turns {
        match turn.role {
            MessageRole::System => {
                system.push_str(&turn.content);
                system.push('\n');
            }
            _ => messages.push(WireMessage {
                role: turn.role.to_string(),
                content: &turn.content,
            }),
        }
    }
    (system.trim().to_string(), messages)
}

pub(crate) async fn invoke(
    client: &Client,
    settings: &ProviderSettings,
    turns: &[ChatTurn],
) -> Result<String> {
    invoke_at(client, defaults::ANTHROPIC_URL, settings, turns).await
}

pub(crate) async fn invoke_at(
    client: &Client,
    url: &str,
    settings: &ProviderSettings,
    turns: &[ChatTurn],
) -> Result<String> {
    let api_key = settings.resolve_api_key().ok_or_else(|| {
        Error::MissingCredential(
            "Anthropic API key required. Set ANTHROPIC_API_KEY or configure one.".to_string(),
        )
    })?;

    let (system, messages) = partition_turns(turns);
    let request = MessagesRequest {
        model: &settings.model,
        max_tokens: defaults::ANTHROPIC_MAX_TOKENS,
        system,
        messages,
    };

    let response = client
        .post(url)
        .header("x-api-key", api_key)
        .header("anthropic-version", defaults::ANTHROPIC_VERSION)
        .json(&request)
        .send()
        .await?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Upstream(format!(
            "Anthropic returned {}: {}",
            status, body
        )));
    }

    let result: MessagesResponse = response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Failed to parse Anthropic response: {}", e)))?;

    let content = result
        .content
        .into_iter()
        .next()
        .map(|b| b.text)
        .unwrap_or_default();

    debug!(
        subsystem = "inference",
        component = "anthropic",
        op = "complete",
        model = %settings.model,
        response_len = content.len(),
        "Completion finished"
    );
    Ok(content)
}
