//! HTTP handlers for lingua-api.

pub mod audio;
pub mod categories;
pub mod chats;
pub mod config;
pub mod documents;
pub mod grammar;
