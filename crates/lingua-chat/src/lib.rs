//! Conversation orchestration for lingua-tutor.
//!
//! Ties the persistence layer and the inference backends together: the
//! send-message flow with grammar-marker extraction, the tutoring prompts,
//! and the speech transcription pipeline with LLM-based correction.

pub mod conversation;
pub mod grammar;
pub mod prompts;
pub mod transcribe;

#[cfg(test)]
mod memory;

pub use conversation::{ChatService, SendMessageResult};
pub use transcribe::{TranscriptionPipeline, SUPPORTED_AUDIO_FORMATS};
