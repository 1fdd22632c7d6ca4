//! Chat repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use lingua_core::{
    Chat, ChatMode, ChatRepository, CreateChatRequest, Error, ListChatsRequest, Result,
};

/// PostgreSQL implementation of [`ChatRepository`].
pub struct PgChatRepository {
    pool: Pool<Postgres>,
}

impl PgChatRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_chat(row: &PgRow) -> Result<Chat> {
    let mode: String = row.get("mode");
    Ok(Chat {
        id: row.get("id"),
        category_id: row.get("category_id"),
        title: row.get("title"),
        mode: mode.parse::<ChatMode>()?,
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        metadata: row.get("metadata"),
    })
}

#[async_trait]
impl ChatRepository for PgChatRepository {
    async fn insert(&self, req: CreateChatRequest) -> Result<Chat> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let metadata = req
            .document_id
            .map(|doc| serde_json::json!({ "document_id": doc.to_string() }));

        let row = sqlx::query(
            r#"
            INSERT INTO chats (id, category_id, title, mode, created_at, updated_at, metadata)
            VALUES ($1, $2, $3, $4, $5, $5, $6)
            RETURNING id, category_id, title, mode, created_at, updated_at, metadata
            "#,
        )
        .bind(id)
        .bind(req.category_id)
        .bind(&req.title)
        .bind(req.mode.to_string())
        .bind(now)
        .bind(metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        row_to_chat(&row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Chat>> {
        let row = sqlx::query(
            "SELECT id, category_id, title, mode, created_at, updated_at, metadata
             FROM chats WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(row_to_chat).transpose()
    }

    async fn list(&self, req: ListChatsRequest) -> Result<Vec<Chat>> {
        let rows = sqlx::query(
            r#"
            SELECT id, category_id, title, mode, created_at, updated_at, metadata
            FROM chats
            WHERE ($1::text IS NULL OR mode = $1)
              AND ($2::uuid IS NULL OR category_id = $2)
            ORDER BY updated_at DESC
            "#,
        )
        .bind(req.mode.map(|m| m.to_string()))
        .bind(req.category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(row_to_chat).collect()
    }

    async fn touch(&self, id: Uuid) -> Result<()> {
        sqlx::query("UPDATE chats SET updated_at = $1 WHERE id = $2")
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        // Messages first; the schema cascade covers this as well.
        sqlx::query("DELETE FROM messages WHERE chat_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        sqlx::query("DELETE FROM chats WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        tx.commit().await.map_err(Error::Database)?;
        Ok(())
    }
}
