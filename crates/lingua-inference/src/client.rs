//! Multi-provider LLM client.
//!
//! One `LlmClient` owns the HTTP connection pool and the injected
//! `ConfigService`. Each completion snapshots the active provider settings
//! and dispatches to the matching translation module, so a configuration
//! swap mid-flight never splits a single request across providers.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use lingua_core::{defaults, ChatBackend, ChatTurn, Error, Result};

use crate::config::ConfigService;
use crate::provider::{ProviderKind, ProviderSettings};
use crate::{anthropic, gemini, ollama, openai};

/// Threshold above which a completion is logged as slow.
const SLOW_COMPLETION_MS: u64 = 30_000;

#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    config: Arc<ConfigService>,
}

impl LlmClient {
    /// Build a client around the given configuration service.
    pub fn new(config: Arc<ConfigService>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Complete against an explicit settings value, bypassing the snapshot.
    pub async fn complete_with(
        &self,
        settings: &ProviderSettings,
        turns: &[ChatTurn],
    ) -> Result<String> {
        let start = Instant::now();
        let result = match settings.provider {
            ProviderKind::Ollama => ollama::invoke(&self.client, settings, turns).await,
            ProviderKind::Openai => openai::invoke(&self.client, settings, turns).await,
            ProviderKind::Anthropic => anthropic::invoke(&self.client, settings, turns).await,
            ProviderKind::Gemini => gemini::invoke(&self.client, settings, turns).await,
        };

        let elapsed = start.elapsed().as_millis() as u64;
        match &result {
            Ok(reply) => {
                debug!(
                    subsystem = "inference",
                    component = "llm_client",
                    op = "complete",
                    provider = %settings.provider,
                    model = %settings.model,
                    turns = turns.len(),
                    response_len = reply.len(),
                    duration_ms = elapsed,
                    "Completion finished"
                );
                if elapsed > SLOW_COMPLETION_MS {
                    warn!(
                        subsystem = "inference",
                        component = "llm_client",
                        provider = %settings.provider,
                        duration_ms = elapsed,
                        slow = true,
                        "Slow completion"
                    );
                }
            }
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "llm_client",
                    op = "complete",
                    provider = %settings.provider,
                    duration_ms = elapsed,
                    error = %e,
                    "Completion failed"
                );
            }
        }
        result
    }
}

#[async_trait]
impl ChatBackend for LlmClient {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String> {
        let settings = self.config.llm().await;
        self.complete_with(&settings, turns).await
    }
}
