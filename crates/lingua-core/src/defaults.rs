//! Centralized default constants for the lingua-tutor system.
//!
//! **This module is the single source of truth** for all shared default
//! values. All crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// LLM PROVIDERS
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default generation model (Ollama).
pub const GEN_MODEL: &str = "llama3.2";

/// Default OpenAI-compatible endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com";

/// Anthropic Messages API endpoint.
pub const ANTHROPIC_URL: &str = "https://api.anthropic.com/v1/messages";

/// Anthropic API version header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Gemini generateContent endpoint prefix (model name appended).
pub const GEMINI_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Fallback Gemini model when the configured model is empty.
pub const GEMINI_FALLBACK_MODEL: &str = "gemini-2.0-flash-lite";

/// Timeout for provider chat requests (seconds).
pub const PROVIDER_TIMEOUT_SECS: u64 = 120;

/// Ollama context window size. The engine default of 2048 truncates
/// multi-turn chats, so multi-turn conversation needs at least 8192.
pub const OLLAMA_NUM_CTX: u32 = 8192;

/// Anthropic max_tokens for a single reply.
pub const ANTHROPIC_MAX_TOKENS: u32 = 4096;

// =============================================================================
// GEMINI GENERATION CONFIG
// =============================================================================

pub const GEMINI_TEMPERATURE: f64 = 0.7;
pub const GEMINI_TOP_K: u32 = 40;
pub const GEMINI_TOP_P: f64 = 0.95;
pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 4096;

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_OLLAMA_BASE_URL: &str = "OLLAMA_BASE_URL";
pub const ENV_DEFAULT_PROVIDER: &str = "DEFAULT_LLM_PROVIDER";
pub const ENV_DEFAULT_MODEL: &str = "DEFAULT_LLM_MODEL";
pub const ENV_WHISPER_BASE_URL: &str = "WHISPER_BASE_URL";
pub const ENV_WHISPER_MODEL: &str = "WHISPER_MODEL";
pub const ENV_WHISPER_LANGUAGE: &str = "WHISPER_LANGUAGE";
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

// =============================================================================
// SPEECH
// =============================================================================

/// Default Whisper-compatible server endpoint (faster-whisper-server/Speaches).
pub const WHISPER_BASE_URL: &str = "http://localhost:8000";

/// Default Whisper model slug.
pub const WHISPER_MODEL: &str = "base";

/// Default transcription language hint (ISO 639-1).
pub const WHISPER_LANGUAGE: &str = "de";

/// Timeout for speech transcription requests (seconds).
pub const WHISPER_TIMEOUT_SECS: u64 = 120;

/// Beam search width for transcription.
pub const WHISPER_BEAM_SIZE: u32 = 5;

/// Maximum accepted audio upload size in bytes (25 MB).
pub const MAX_AUDIO_SIZE_BYTES: usize = 25 * 1024 * 1024;

// =============================================================================
// CONVERSATION
// =============================================================================

/// Number of recent turns included as disambiguation context in the
/// transcription-correction prompt.
pub const CORRECTION_CONTEXT_TURNS: usize = 10;

/// Language name used when a detected language code is unrecognized.
pub const FALLBACK_LANGUAGE_NAME: &str = "German";

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 8000;
