//! Document repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use lingua_core::{Document, DocumentRepository, Error, Result};

/// PostgreSQL implementation of [`DocumentRepository`].
pub struct PgDocumentRepository {
    pool: Pool<Postgres>,
}

impl PgDocumentRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_document(row: &PgRow) -> Document {
    Document {
        id: row.get("id"),
        filename: row.get("filename"),
        content: row.get("content"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl DocumentRepository for PgDocumentRepository {
    async fn insert(&self, filename: &str, content: &str) -> Result<Document> {
        let row = sqlx::query(
            r#"
            INSERT INTO documents (id, filename, content, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, filename, content, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(filename)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row_to_document(&row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, filename, content, created_at FROM documents WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_document))
    }

    async fn list(&self) -> Result<Vec<Document>> {
        let rows = sqlx::query(
            "SELECT id, filename, content, created_at FROM documents ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(row_to_document).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
