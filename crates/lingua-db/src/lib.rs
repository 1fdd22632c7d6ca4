//! # lingua-db
//!
//! PostgreSQL database layer for lingua-tutor.
//!
//! This crate provides:
//! - Connection pool management
//! - Repository implementations for chats, messages, documents,
//!   categories, and grammar rules
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use lingua_db::Database;
//! use lingua_core::{ChatMode, CreateChatRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/lingua").await?;
//!     db.migrate().await?;
//!
//!     let chat = db.chats.insert(CreateChatRequest {
//!         title: "Small talk".to_string(),
//!         mode: ChatMode::FreeTalk,
//!         category_id: None,
//!         document_id: None,
//!     }).await?;
//!
//!     println!("Created chat: {}", chat.id);
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod chats;
pub mod documents;
pub mod grammar_rules;
pub mod messages;
pub mod pool;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::info;

use lingua_core::{Error, Result};

pub use categories::PgCategoryRepository;
pub use chats::PgChatRepository;
pub use documents::PgDocumentRepository;
pub use grammar_rules::PgGrammarRuleRepository;
pub use messages::PgMessageRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};

/// Aggregate of all repositories, sharing one connection pool.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
    pub chats: Arc<PgChatRepository>,
    pub messages: Arc<PgMessageRepository>,
    pub documents: Arc<PgDocumentRepository>,
    pub categories: Arc<PgCategoryRepository>,
    pub grammar_rules: Arc<PgGrammarRuleRepository>,
}

impl Database {
    /// Connect to the database with default pool settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = create_pool(database_url).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build the repository aggregate over an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            chats: Arc::new(PgChatRepository::new(pool.clone())),
            messages: Arc::new(PgMessageRepository::new(pool.clone())),
            documents: Arc::new(PgDocumentRepository::new(pool.clone())),
            categories: Arc::new(PgCategoryRepository::new(pool.clone())),
            grammar_rules: Arc::new(PgGrammarRuleRepository::new(pool.clone())),
            pool,
        }
    }

    /// Run embedded schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Config(format!("Migration failed: {}", e)))?;
        info!(subsystem = "db", op = "migrate", "Schema migrations applied");
        Ok(())
    }

    /// Access the underlying pool (health checks, ad-hoc queries in tests).
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests;
