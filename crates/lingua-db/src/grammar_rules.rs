//! Grammar rule repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use lingua_core::{
    CreateGrammarRuleRequest, Error, GrammarRule, GrammarRuleRepository, Result,
};

/// PostgreSQL implementation of [`GrammarRuleRepository`].
pub struct PgGrammarRuleRepository {
    pool: Pool<Postgres>,
}

impl PgGrammarRuleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn row_to_rule(row: &PgRow) -> GrammarRule {
    GrammarRule {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        examples: row.get("examples"),
        chat_id: row.get("chat_id"),
        created_at: row.get("created_at"),
    }
}

#[async_trait]
impl GrammarRuleRepository for PgGrammarRuleRepository {
    async fn insert(&self, req: CreateGrammarRuleRequest) -> Result<GrammarRule> {
        let row = sqlx::query(
            r#"
            INSERT INTO grammar_rules (id, name, description, examples, chat_id, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, description, examples, chat_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&req.name)
        .bind(&req.description)
        .bind(&req.examples)
        .bind(req.chat_id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row_to_rule(&row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<GrammarRule>> {
        let row = sqlx::query(
            "SELECT id, name, description, examples, chat_id, created_at
             FROM grammar_rules WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(row_to_rule))
    }

    async fn list(&self) -> Result<Vec<GrammarRule>> {
        let rows = sqlx::query(
            "SELECT id, name, description, examples, chat_id, created_at
             FROM grammar_rules ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows.iter().map(row_to_rule).collect())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM grammar_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(())
    }
}
