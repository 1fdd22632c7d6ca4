//! Conversation orchestration.
//!
//! `ChatService` owns the send-message flow: persist the user turn first,
//! assemble the prompt from mode and history, call the chat backend, then
//! persist the cleaned reply with any grammar annotation. The user turn is
//! saved before the backend call so a provider failure never drops it.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};
use uuid::Uuid;

use lingua_core::{
    Chat, ChatBackend, ChatMode, ChatRepository, ChatTurn, CreateChatRequest, DocumentRepository,
    Error, GrammarDetection, InsertMessageRequest, ListChatsRequest, Message, MessageRepository,
    MessageRole, Result,
};

use crate::grammar;
use crate::prompts;

/// Result of a send-message round: both persisted turns plus the grammar
/// annotation extracted from the reply, if any.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageResult {
    pub user_message: Message,
    pub assistant_message: Message,
    pub grammar_detected: Option<GrammarDetection>,
}

#[derive(Clone)]
pub struct ChatService {
    chats: Arc<dyn ChatRepository>,
    messages: Arc<dyn MessageRepository>,
    documents: Arc<dyn DocumentRepository>,
    backend: Arc<dyn ChatBackend>,
}

impl ChatService {
    pub fn new(
        chats: Arc<dyn ChatRepository>,
        messages: Arc<dyn MessageRepository>,
        documents: Arc<dyn DocumentRepository>,
        backend: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            chats,
            messages,
            documents,
            backend,
        }
    }

    /// Create a chat.
    pub async fn create_chat(&self, req: CreateChatRequest) -> Result<Chat> {
        if req.title.trim().is_empty() {
            return Err(Error::InvalidInput("Chat title must not be empty".to_string()));
        }
        let chat = self.chats.insert(req).await?;
        info!(
            subsystem = "chat",
            op = "create_chat",
            chat_id = %chat.id,
            mode = %chat.mode,
            "Chat created"
        );
        Ok(chat)
    }

    /// Fetch a chat together with its full ordered message history.
    pub async fn get_chat(&self, id: Uuid) -> Result<(Chat, Vec<Message>)> {
        let chat = self.chats.get(id).await?.ok_or(Error::ChatNotFound(id))?;
        let messages = self.messages.list_for_chat(id).await?;
        Ok((chat, messages))
    }

    /// List chats with optional mode/category filters, newest activity first.
    pub async fn list_chats(&self, req: ListChatsRequest) -> Result<Vec<Chat>> {
        self.chats.list(req).await
    }

    /// Delete a chat and its messages.
    pub async fn delete_chat(&self, id: Uuid) -> Result<()> {
        self.chats.get(id).await?.ok_or(Error::ChatNotFound(id))?;
        self.chats.delete(id).await?;
        info!(subsystem = "chat", op = "delete_chat", chat_id = %id, "Chat deleted");
        Ok(())
    }

    /// Full message history of a chat as provider-neutral turns.
    pub async fn history(&self, chat_id: Uuid) -> Result<Vec<ChatTurn>> {
        let messages = self.messages.list_for_chat(chat_id).await?;
        Ok(messages.iter().map(ChatTurn::from).collect())
    }

    /// Send a user message and produce the assistant reply.
    pub async fn send_message(
        &self,
        chat_id: Uuid,
        content: String,
        detect_grammar: bool,
    ) -> Result<SendMessageResult> {
        let start = Instant::now();

        let chat = self
            .chats
            .get(chat_id)
            .await?
            .ok_or(Error::ChatNotFound(chat_id))?;

        let document_content = self.document_content(&chat).await?;

        // The user turn is persisted before the provider call; a backend
        // failure surfaces to the caller but the turn survives.
        let user_message = self
            .messages
            .insert(InsertMessageRequest {
                chat_id,
                role: MessageRole::User,
                content,
                metadata: None,
            })
            .await?;

        let history = self.messages.list_for_chat(chat_id).await?;
        let mut turns = Vec::with_capacity(history.len() + 1);
        turns.push(prompts::system_turn(chat.mode, document_content.as_deref()));
        turns.extend(history.iter().map(ChatTurn::from));

        let raw_reply = self.backend.complete(&turns).await?;

        let (reply, grammar_detected) = if detect_grammar {
            grammar::extract(&raw_reply)
        } else {
            (raw_reply, None)
        };

        let metadata = match &grammar_detected {
            Some(detection) => Some(serde_json::json!({ "grammar_detected": detection })),
            None => None,
        };
        let assistant_message = self
            .messages
            .insert(InsertMessageRequest {
                chat_id,
                role: MessageRole::Assistant,
                content: reply,
                metadata,
            })
            .await?;

        self.chats.touch(chat_id).await?;

        debug!(
            subsystem = "chat",
            op = "send_message",
            chat_id = %chat_id,
            turns = turns.len(),
            grammar = grammar_detected.is_some(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Message round complete"
        );

        Ok(SendMessageResult {
            user_message,
            assistant_message,
            grammar_detected,
        })
    }

    /// Document body for a document-mode chat. A missing or dangling
    /// document reference degrades to no context rather than failing.
    async fn document_content(&self, chat: &Chat) -> Result<Option<String>> {
        if chat.mode != ChatMode::Document {
            return Ok(None);
        }
        let Some(doc_id) = chat.document_id() else {
            return Ok(None);
        };
        match self.documents.get(doc_id).await? {
            Some(doc) => Ok(Some(doc.content)),
            None => {
                warn!(
                    subsystem = "chat",
                    chat_id = %chat.id,
                    document_id = %doc_id,
                    "Document referenced by chat no longer exists"
                );
                Ok(None)
            }
        }
    }
}
