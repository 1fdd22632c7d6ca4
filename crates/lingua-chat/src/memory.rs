//! In-memory repositories for orchestrator tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use lingua_core::{
    Chat, ChatRepository, CreateChatRequest, Document, DocumentRepository, Error,
    InsertMessageRequest, ListChatsRequest, Message, MessageRepository, Result,
};

#[derive(Default)]
pub struct InMemoryChats {
    chats: Mutex<Vec<Chat>>,
}

#[async_trait]
impl ChatRepository for InMemoryChats {
    async fn insert(&self, req: CreateChatRequest) -> Result<Chat> {
        let now = Utc::now();
        let metadata = req
            .document_id
            .map(|id| serde_json::json!({ "document_id": id.to_string() }));
        let chat = Chat {
            id: Uuid::new_v4(),
            category_id: req.category_id,
            title: req.title,
            mode: req.mode,
            created_at: now,
            updated_at: now,
            metadata,
        };
        self.chats.lock().unwrap().push(chat.clone());
        Ok(chat)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Chat>> {
        Ok(self.chats.lock().unwrap().iter().find(|c| c.id == id).cloned())
    }

    async fn list(&self, req: ListChatsRequest) -> Result<Vec<Chat>> {
        let mut chats: Vec<Chat> = self
            .chats
            .lock()
            .unwrap()
            .iter()
            .filter(|c| req.mode.map_or(true, |m| c.mode == m))
            .filter(|c| req.category_id.map_or(true, |id| c.category_id == Some(id)))
            .cloned()
            .collect();
        chats.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(chats)
    }

    async fn touch(&self, id: Uuid) -> Result<()> {
        let mut chats = self.chats.lock().unwrap();
        let chat = chats
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(Error::ChatNotFound(id))?;
        chat.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.chats.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryMessages {
    messages: Mutex<Vec<Message>>,
}

#[async_trait]
impl MessageRepository for InMemoryMessages {
    async fn insert(&self, req: InsertMessageRequest) -> Result<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            chat_id: req.chat_id,
            role: req.role,
            content: req.content,
            created_at: Utc::now(),
            metadata: req.metadata,
        };
        self.messages.lock().unwrap().push(message.clone());
        Ok(message)
    }

    async fn list_for_chat(&self, chat_id: Uuid) -> Result<Vec<Message>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.chat_id == chat_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryDocuments {
    documents: Mutex<Vec<Document>>,
}

#[async_trait]
impl DocumentRepository for InMemoryDocuments {
    async fn insert(&self, filename: &str, content: &str) -> Result<Document> {
        let document = Document {
            id: Uuid::new_v4(),
            filename: filename.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
        };
        self.documents.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Document>> {
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        self.documents.lock().unwrap().retain(|d| d.id != id);
        Ok(())
    }
}
