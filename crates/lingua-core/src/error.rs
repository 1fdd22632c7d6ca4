//! Error types for lingua-tutor.

use thiserror::Error;

/// Result type alias using lingua-tutor's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lingua-tutor operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation failed (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Chat not found
    #[error("Chat not found: {0}")]
    ChatNotFound(uuid::Uuid),

    /// Document not found
    #[error("Document not found: {0}")]
    DocumentNotFound(uuid::Uuid),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Required API key is absent for a provider that mandates one
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    /// Provider/engine unreachable (e.g. local LLM runtime not started)
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Non-success response from an LLM or speech provider
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Speech-to-text operation failed
    #[error("Transcription error: {0}")]
    Transcription(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            Error::UpstreamUnavailable(e.to_string())
        } else {
            Error::Upstream(e.to_string())
        }
    }
}
