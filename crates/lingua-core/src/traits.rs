//! Core traits for lingua-tutor abstractions.
//!
//! These traits define the interfaces that concrete implementations must
//! satisfy, enabling pluggable backends and testability: Postgres
//! repositories in `lingua-db`, HTTP backends in `lingua-inference`, and
//! in-memory fakes in tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// REPOSITORY TRAITS
// =============================================================================

/// Request for creating a new chat.
#[derive(Debug, Clone)]
pub struct CreateChatRequest {
    pub title: String,
    pub mode: ChatMode,
    pub category_id: Option<Uuid>,
    /// Document to study in document mode; stored in chat metadata.
    pub document_id: Option<Uuid>,
}

/// Filters for listing chats.
#[derive(Debug, Clone, Default)]
pub struct ListChatsRequest {
    pub mode: Option<ChatMode>,
    pub category_id: Option<Uuid>,
}

/// Repository for chat CRUD operations.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Insert a new chat and return it.
    async fn insert(&self, req: CreateChatRequest) -> Result<Chat>;

    /// Fetch a chat by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Chat>>;

    /// List chats with optional filters, most recently updated first.
    async fn list(&self, req: ListChatsRequest) -> Result<Vec<Chat>>;

    /// Bump the chat's updated-at timestamp.
    async fn touch(&self, id: Uuid) -> Result<()>;

    /// Delete a chat and all its messages.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Request for inserting a message into a chat.
#[derive(Debug, Clone)]
pub struct InsertMessageRequest {
    pub chat_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub metadata: Option<JsonValue>,
}

/// Repository for message operations. Messages are immutable once created.
#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Insert a message and return it as persisted.
    async fn insert(&self, req: InsertMessageRequest) -> Result<Message>;

    /// List all messages of a chat in ascending creation-time order.
    async fn list_for_chat(&self, chat_id: Uuid) -> Result<Vec<Message>>;
}

/// Repository for study documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Insert a document and return it.
    async fn insert(&self, filename: &str, content: &str) -> Result<Document>;

    /// Fetch a document by ID.
    async fn get(&self, id: Uuid) -> Result<Option<Document>>;

    /// List all documents, newest first.
    async fn list(&self) -> Result<Vec<Document>>;

    /// Delete a document.
    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Repository for chat categories.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, name: &str, kind: CategoryKind) -> Result<Category>;

    async fn get(&self, id: Uuid) -> Result<Option<Category>>;

    /// Look up a category by exact name within a kind.
    async fn find_by_name(&self, name: &str, kind: CategoryKind) -> Result<Option<Category>>;

    async fn list(&self) -> Result<Vec<Category>>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// Request for saving a grammar rule.
#[derive(Debug, Clone)]
pub struct CreateGrammarRuleRequest {
    pub name: String,
    pub description: Option<String>,
    pub examples: Option<String>,
    pub chat_id: Option<Uuid>,
}

/// Repository for learned grammar rules.
#[async_trait]
pub trait GrammarRuleRepository: Send + Sync {
    async fn insert(&self, req: CreateGrammarRuleRequest) -> Result<GrammarRule>;

    async fn get(&self, id: Uuid) -> Result<Option<GrammarRule>>;

    async fn list(&self) -> Result<Vec<GrammarRule>>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

// =============================================================================
// BACKEND TRAITS
// =============================================================================

/// A chat-completion backend: turns an ordered message list into exactly
/// one assistant reply. Implemented by the multi-provider LLM client and
/// by mocks in tests.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Produce the full assistant reply for the given turns.
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String>;
}

/// A speech-to-text engine operating on an on-disk audio file.
#[async_trait]
pub trait SpeechBackend: Send + Sync {
    /// Transcribe the audio file at `path`, optionally hinting the language.
    async fn transcribe(
        &self,
        path: &std::path::Path,
        language: Option<&str>,
    ) -> Result<SpeechTranscript>;
}
