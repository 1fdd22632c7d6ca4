//! Provider configuration for the four supported LLM vendors.
//!
//! The provider is a closed tagged-variant: adding a vendor means adding a
//! variant and its translation module, call sites stay untouched.

use serde::{Deserialize, Serialize};

use lingua_core::defaults;

/// Supported LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    Ollama,
    Openai,
    Anthropic,
    Gemini,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::Openai => write!(f, "openai"),
            Self::Anthropic => write!(f, "anthropic"),
            Self::Gemini => write!(f, "gemini"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = lingua_core::Error;

    fn from_str(s: &str) -> lingua_core::Result<Self> {
        match s {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::Openai),
            "anthropic" => Ok(Self::Anthropic),
            "gemini" => Ok(Self::Gemini),
            other => Err(lingua_core::Error::Config(format!(
                "Unknown provider: {}",
                other
            ))),
        }
    }
}

impl ProviderKind {
    /// Environment variable holding this provider's API key, if it uses one.
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => None,
            Self::Openai => Some(defaults::ENV_OPENAI_API_KEY),
            Self::Anthropic => Some(defaults::ENV_ANTHROPIC_API_KEY),
            Self::Gemini => Some(defaults::ENV_GEMINI_API_KEY),
        }
    }
}

/// Settings for the active LLM provider. Replaced wholesale on update,
/// never merged field-by-field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub provider: ProviderKind,
    pub model: String,
    pub base_url: String,
    /// Explicit API key; absent means fall back to the environment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ProviderSettings {
    /// Resolve the API key: explicit key on the settings, then the
    /// provider-keyed environment variable, then absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = &self.api_key {
            if !key.is_empty() {
                return Some(key.clone());
            }
        }
        self.provider
            .api_key_env()
            .and_then(|var| std::env::var(var).ok())
            .filter(|k| !k.is_empty())
    }

    /// Build settings from environment variables, defaulting to local Ollama.
    pub fn from_env() -> Self {
        let provider = std::env::var(defaults::ENV_DEFAULT_PROVIDER)
            .ok()
            .and_then(|s| s.parse::<ProviderKind>().ok())
            .unwrap_or(ProviderKind::Ollama);
        let model = std::env::var(defaults::ENV_DEFAULT_MODEL)
            .unwrap_or_else(|_| defaults::GEN_MODEL.to_string());
        let base_url = std::env::var(defaults::ENV_OLLAMA_BASE_URL)
            .unwrap_or_else(|_| defaults::OLLAMA_URL.to_string());

        Self {
            provider,
            model,
            base_url,
            api_key: None,
        }
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Ollama,
            model: defaults::GEN_MODEL.to_string(),
            base_url: defaults::OLLAMA_URL.to_string(),
            api_key: None,
        }
    }
}

/// Settings for the speech-to-text engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhisperSettings {
    pub base_url: String,
    pub model: String,
    /// Default language hint (ISO 639-1).
    pub language: String,
}

impl WhisperSettings {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(defaults::ENV_WHISPER_BASE_URL)
                .unwrap_or_else(|_| defaults::WHISPER_BASE_URL.to_string()),
            model: std::env::var(defaults::ENV_WHISPER_MODEL)
                .unwrap_or_else(|_| defaults::WHISPER_MODEL.to_string()),
            language: std::env::var(defaults::ENV_WHISPER_LANGUAGE)
                .unwrap_or_else(|_| defaults::WHISPER_LANGUAGE.to_string()),
        }
    }
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            base_url: defaults::WHISPER_BASE_URL.to_string(),
            model: defaults::WHISPER_MODEL.to_string(),
            language: defaults::WHISPER_LANGUAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_kind_round_trip() {
        for (kind, s) in [
            (ProviderKind::Ollama, "ollama"),
            (ProviderKind::Openai, "openai"),
            (ProviderKind::Anthropic, "anthropic"),
            (ProviderKind::Gemini, "gemini"),
        ] {
            assert_eq!(kind.to_string(), s);
            assert_eq!(s.parse::<ProviderKind>().unwrap(), kind);
        }
    }

    #[test]
    fn provider_kind_unknown_rejected() {
        assert!("azure".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn provider_kind_serde_snake_case() {
        let json = serde_json::to_string(&ProviderKind::Anthropic).unwrap();
        assert_eq!(json, "\"anthropic\"");
    }

    #[test]
    fn ollama_has_no_key_env() {
        assert!(ProviderKind::Ollama.api_key_env().is_none());
        assert_eq!(
            ProviderKind::Gemini.api_key_env(),
            Some(defaults::ENV_GEMINI_API_KEY)
        );
    }

    #[test]
    fn explicit_key_wins_over_env() {
        let settings = ProviderSettings {
            provider: ProviderKind::Openai,
            model: "gpt-4o-mini".to_string(),
            base_url: defaults::OPENAI_URL.to_string(),
            api_key: Some("sk-explicit".to_string()),
        };
        assert_eq!(settings.resolve_api_key().as_deref(), Some("sk-explicit"));
    }

    #[test]
    fn empty_explicit_key_falls_through() {
        let settings = ProviderSettings {
            provider: ProviderKind::Ollama,
            model: "llama3.2".to_string(),
            base_url: defaults::OLLAMA_URL.to_string(),
            api_key: Some(String::new()),
        };
        // Ollama has no key env, so the empty explicit key resolves to none.
        assert!(settings.resolve_api_key().is_none());
    }

    #[test]
    fn default_settings_target_local_ollama() {
        let settings = ProviderSettings::default();
        assert_eq!(settings.provider, ProviderKind::Ollama);
        assert_eq!(settings.base_url, defaults::OLLAMA_URL);
        assert!(settings.api_key.is_none());
    }

    #[test]
    fn settings_serde_skips_absent_key() {
        let settings = ProviderSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("api_key"));
    }

    #[test]
    fn whisper_settings_defaults() {
        let settings = WhisperSettings::default();
        assert_eq!(settings.model, defaults::WHISPER_MODEL);
        assert_eq!(settings.language, "de");
    }
}
