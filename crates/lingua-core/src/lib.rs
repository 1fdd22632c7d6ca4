//! # lingua-core
//!
//! Core types, traits, and abstractions for the lingua-tutor backend.
//!
//! This crate provides the foundational data structures and trait definitions
//! that the other lingua-tutor crates depend on: the chat/message/document
//! data model, the error taxonomy, and the repository and backend interfaces.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;
