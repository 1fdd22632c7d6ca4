//! Category repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use lingua_core::{Category, CategoryKind, CategoryRepository, Error, Result};

/// PostgreSQL implementation of [`CategoryRepository`].
pub struct PgCategoryRepository {
    pool: Pool<Postgres>,
}

impl PgCategoryRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_category(row: &PgRow) -> Result<Category> {
    let kind: String = row.get("kind");
    Ok(Category {
        id: row.get("id"),
        name: row.get("name"),
        kind: kind.parse::<CategoryKind>()?,
        created_at: row.get("created_at"),
        metadata: row.get("metadata"),
    })
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn insert(&self, name: &str, kind: CategoryKind) -> Result<Category> {
        let row = sqlx::query(
            r#"
            INSERT INTO categories (id, name, kind, created_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, kind, created_at, metadata
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(kind.to_string())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        row_to_category(&row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, kind, created_at, metadata FROM categories WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn find_by_name(&self, name: &str, kind: CategoryKind) -> Result<Option<Category>> {
        let row = sqlx::query(
            "SELECT id, name, kind, created_at, metadata FROM categories WHERE name = $1 AND kind = $2",
        )
        .bind(name)
        .bind(kind.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        row.as_ref().map(row_to_category).transpose()
    }

    async fn list(&self) -> Result<Vec<Category>> {
        let rows = sqlx::query(
            "SELECT id, name, kind, created_at, metadata FROM categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(row_to_category).collect()
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
