//! Process-wide replaceable provider configuration.
//!
//! One `ConfigService` is constructed at startup and injected wherever the
//! active settings are needed. There is no global static: callers take a
//! snapshot per operation, so a request observes one consistent
//! configuration for its whole lifetime.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::provider::{ProviderSettings, WhisperSettings};

#[derive(Debug, Clone, Default)]
struct ConfigState {
    llm: ProviderSettings,
    whisper: WhisperSettings,
}

/// Injected configuration service with atomic swap semantics.
///
/// `replace_*` swaps the whole settings value; there is no partial-field
/// merge. A replacement is visible to every `snapshot()` taken after the
/// write lock is released.
#[derive(Clone)]
pub struct ConfigService {
    state: Arc<RwLock<ConfigState>>,
}

impl ConfigService {
    /// Create a service holding the given initial settings.
    pub fn new(llm: ProviderSettings, whisper: WhisperSettings) -> Self {
        Self {
            state: Arc::new(RwLock::new(ConfigState { llm, whisper })),
        }
    }

    /// Create a service initialized from environment variables.
    pub fn from_env() -> Self {
        Self::new(ProviderSettings::from_env(), WhisperSettings::from_env())
    }

    /// Current LLM provider settings.
    pub async fn llm(&self) -> ProviderSettings {
        self.state.read().await.llm.clone()
    }

    /// Current speech engine settings.
    pub async fn whisper(&self) -> WhisperSettings {
        self.state.read().await.whisper.clone()
    }

    /// Replace the LLM settings wholesale.
    pub async fn replace_llm(&self, settings: ProviderSettings) {
        info!(
            subsystem = "inference",
            component = "config",
            op = "replace_llm",
            provider = %settings.provider,
            model = %settings.model,
            "Replacing LLM provider settings"
        );
        self.state.write().await.llm = settings;
    }

    /// Replace the speech engine settings wholesale.
    pub async fn replace_whisper(&self, settings: WhisperSettings) {
        info!(
            subsystem = "inference",
            component = "config",
            op = "replace_whisper",
            model = %settings.model,
            "Replacing speech engine settings"
        );
        self.state.write().await.whisper = settings;
    }
}
