//! Message repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use lingua_core::{
    Error, InsertMessageRequest, Message, MessageRepository, MessageRole, Result,
};

/// PostgreSQL implementation of [`MessageRepository`].
pub struct PgMessageRepository {
    pool: Pool<Postgres>,
}

impl PgMessageRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_message(row: &PgRow) -> Result<Message> {
    let role: String = row.get("role");
    Ok(Message {
        id: row.get("id"),
        chat_id: row.get("chat_id"),
        role: role.parse::<MessageRole>()?,
        content: row.get("content"),
        created_at: row.get("created_at"),
        metadata: row.get("metadata"),
    })
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, req: InsertMessageRequest) -> Result<Message> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO messages (id, chat_id, role, content, created_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, chat_id, role, content, created_at, metadata
            "#,
        )
        .bind(id)
        .bind(req.chat_id)
        .bind(req.role.to_string())
        .bind(&req.content)
        .bind(now)
        .bind(req.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                Error::ChatNotFound(req.chat_id)
            }
            _ => Error::Database(e),
        })?;

        row_to_message(&row)
    }

    async fn list_for_chat(&self, chat_id: Uuid) -> Result<Vec<Message>> {
        let rows = sqlx::query(
            "SELECT id, chat_id, role, content, created_at, metadata
             FROM messages WHERE chat_id = $1 ORDER BY created_at ASC, seq ASC",
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(row_to_message).collect()
    }
}
