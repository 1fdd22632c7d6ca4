//! Structured logging field name constants for lingua-tutor.
//!
//! All crates use these constants for consistent structured logging fields,
//! so log aggregation tools can query by standardized field names across
//! every subsystem.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Recoverable issue, automatic fallback applied |
//! | INFO  | Lifecycle events (startup, shutdown), operation completions |
//! | DEBUG | Decision points, intermediate values, config choices |

/// Subsystem originating the log event.
/// Values: "api", "db", "inference", "chat", "speech"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "ollama", "gemini", "pool", "pipeline"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "complete", "send_message", "transcribe"
pub const OPERATION: &str = "op";

/// Chat UUID being operated on.
pub const CHAT_ID: &str = "chat_id";

/// Provider kind used for an LLM call.
pub const PROVIDER: &str = "provider";

/// Model name used for inference or transcription.
pub const MODEL: &str = "model";

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Byte length of a prompt or response.
pub const PROMPT_LEN: &str = "prompt_len";

/// Byte length of a model response.
pub const RESPONSE_LEN: &str = "response_len";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";
