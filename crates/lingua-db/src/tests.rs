//! Integration tests requiring a live PostgreSQL instance.
//!
//! Run with: DATABASE_URL=postgres://... cargo test -p lingua-db -- --ignored

use uuid::Uuid;

use crate::Database;
use lingua_core::{
    ChatMode, ChatRepository, CreateChatRequest, InsertMessageRequest, ListChatsRequest,
    MessageRepository, MessageRole,
};

async fn test_db() -> Database {
    dotenvy::dotenv().ok();
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for db tests");
    let db = Database::connect(&url).await.expect("connect failed");
    db.migrate().await.expect("migrate failed");
    db
}

#[tokio::test]
#[ignore]
async fn chat_insert_and_get_round_trip() {
    let db = test_db().await;

    let chat = db
        .chats
        .insert(CreateChatRequest {
            title: "Integration chat".to_string(),
            mode: ChatMode::FreeTalk,
            category_id: None,
            document_id: None,
        })
        .await
        .unwrap();

    let fetched = db.chats.get(chat.id).await.unwrap().expect("chat missing");
    assert_eq!(fetched.title, "Integration chat");
    assert_eq!(fetched.mode, ChatMode::FreeTalk);

    db.chats.delete(chat.id).await.unwrap();
    assert!(db.chats.get(chat.id).await.unwrap().is_none());
}

#[tokio::test]
#[ignore]
async fn messages_listed_in_creation_order() {
    let db = test_db().await;

    let chat = db
        .chats
        .insert(CreateChatRequest {
            title: "Ordering".to_string(),
            mode: ChatMode::Grammar,
            category_id: None,
            document_id: None,
        })
        .await
        .unwrap();

    for content in ["first", "second", "third"] {
        db.messages
            .insert(InsertMessageRequest {
                chat_id: chat.id,
                role: MessageRole::User,
                content: content.to_string(),
                metadata: None,
            })
            .await
            .unwrap();
    }

    let history = db.messages.list_for_chat(chat.id).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);

    db.chats.delete(chat.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn same_timestamp_messages_keep_insertion_order() {
    let db = test_db().await;

    let chat = db
        .chats
        .insert(CreateChatRequest {
            title: "Tiebreak".to_string(),
            mode: ChatMode::FreeTalk,
            category_id: None,
            document_id: None,
        })
        .await
        .unwrap();

    // Force an identical created_at on both rows; seq must decide.
    let stamp = chrono::Utc::now();
    for (role, content) in [("user", "wie geht's"), ("assistant", "Gut, danke!")] {
        sqlx::query(
            "INSERT INTO messages (id, chat_id, role, content, created_at)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(Uuid::new_v4())
        .bind(chat.id)
        .bind(role)
        .bind(content)
        .bind(stamp)
        .execute(db.pool())
        .await
        .unwrap();
    }

    let history = db.messages.list_for_chat(chat.id).await.unwrap();
    let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["wie geht's", "Gut, danke!"]);

    db.chats.delete(chat.id).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn chat_delete_cascades_to_messages() {
    let db = test_db().await;

    let chat = db
        .chats
        .insert(CreateChatRequest {
            title: "Cascade".to_string(),
            mode: ChatMode::FreeTalk,
            category_id: None,
            document_id: None,
        })
        .await
        .unwrap();

    db.messages
        .insert(InsertMessageRequest {
            chat_id: chat.id,
            role: MessageRole::User,
            content: "Hallo".to_string(),
            metadata: None,
        })
        .await
        .unwrap();

    db.chats.delete(chat.id).await.unwrap();

    let orphans = db.messages.list_for_chat(chat.id).await.unwrap();
    assert!(orphans.is_empty(), "messages must not survive chat deletion");
}

#[tokio::test]
#[ignore]
async fn message_to_nonexistent_chat_fails() {
    let db = test_db().await;

    let err = db
        .messages
        .insert(InsertMessageRequest {
            chat_id: Uuid::new_v4(),
            role: MessageRole::User,
            content: "orphan".to_string(),
            metadata: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, lingua_core::Error::ChatNotFound(_)));
}

#[tokio::test]
#[ignore]
async fn chat_list_filters_by_mode() {
    let db = test_db().await;

    let chat = db
        .chats
        .insert(CreateChatRequest {
            title: "Document study".to_string(),
            mode: ChatMode::Document,
            category_id: None,
            document_id: None,
        })
        .await
        .unwrap();

    let listed = db
        .chats
        .list(ListChatsRequest {
            mode: Some(ChatMode::Document),
            category_id: None,
        })
        .await
        .unwrap();
    assert!(listed.iter().any(|c| c.id == chat.id));

    let other = db
        .chats
        .list(ListChatsRequest {
            mode: Some(ChatMode::Grammar),
            category_id: None,
        })
        .await
        .unwrap();
    assert!(!other.iter().any(|c| c.id == chat.id));

    db.chats.delete(chat.id).await.unwrap();
}
