//! Ollama chat translation.
//!
//! Messages go to `/api/chat` verbatim (system/user/assistant roles kept
//! as-is), non-streaming, with the context window widened for multi-turn
//! conversations.

use std::time::Instant;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use lingua_core::{defaults, ChatTurn, Error, Result};

use crate::provider::ProviderSettings;

#[derive(Serialize)]
struct WireMessage<'a> {
    role: String,
    content: &'a str,
}

#[derive(Serialize)]
struct Options {
    num_ctx: u32,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    stream: bool,
    options: Options,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

pub(crate) async fn invoke(
    client: &Client,
    settings: &ProviderSettings,
    turns: &[ChatTurn],
) -> Result<String> {
    let start = Instant::now();

    let request = ChatRequest {
        model: &settings.model,
        messages: turns
            .iter()
            .map(|t| WireMessage {
                role: t.role.to_string(),
                content: &t.content,
            })
            .collect(),
        stream: false,
        options: Options {
            num_ctx: defaults::OLLAMA_NUM_CTX,
        },
    };

    let response = client
        .post(format!("{}/api/chat", settings.base_url))
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            if e.is_connect() {
                Error::UpstreamUnavailable(
                    "Cannot connect to Ollama. Is it running? Start it with 'ollama serve'"
                        .to_string(),
                )
            } else {
                Error::Upstream(format!("Ollama request failed: {}", e))
            }
        })?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(Error::Upstream(format!(
            "Ollama returned {}: {}",
            status, body
        )));
    }

    let result: ChatResponse = response
        .json()
        .await
        .map_err(|e| Error::Upstream(format!("Failed to parse Ollama response: {}", e)))?;

    let content = result.message.content;
    let elapsed = start.elapsed().as_millis() as u64;
    debug!(
        subsystem = "inference",
        component = "ollama",
        op = "complete",
        model = %settings.model,
        response_len = content.len(),
        duration_ms = elapsed,
        "Completion finished"
    );
    if elapsed > 30_000 {
        warn!(
            subsystem = "inference",
            component = "ollama",
            duration_ms = elapsed,
            slow = true,
            "Slow completion"
        );
    }
    Ok(content)
}
