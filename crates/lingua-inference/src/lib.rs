//! Inference backends for lingua-tutor.
//!
//! Translates the provider-neutral conversation model into the wire
//! formats of the supported LLM vendors (Ollama, OpenAI, Anthropic,
//! Gemini) and a Whisper-compatible speech server. The active provider is
//! held by an injected [`ConfigService`] and can be swapped at runtime.

mod anthropic;
mod gemini;
mod ollama;
mod openai;

pub mod config;
pub mod mock;
pub mod provider;
pub mod transcription;

mod client;

pub use client::LlmClient;
pub use config::ConfigService;
pub use provider::{ProviderKind, ProviderSettings, WhisperSettings};
pub use transcription::WhisperBackend;
