pub mod memory;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "postgres")]
pub mod schema;

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::errors::ServiceError;
use crate::models::{Note, UpdateNote};
use crate::utils::naming::table_name;

/// Physical table backing the notes resource. Derived once, explicitly,
/// instead of at type-declaration time.
pub fn notes_table() -> String {
    table_name("core", "Note")
}

/// Store trait abstracting the persistence backend. One method per
/// resource capability; routes mount only the capabilities they expose.
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn create(&self, title: String, body: Option<String>) -> Result<Note, ServiceError>;

    /// Page of non-deleted notes plus the total non-deleted count.
    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Note>, i64), ServiceError>;

    async fn retrieve(&self, id: Uuid) -> Result<Option<Note>, ServiceError>;

    async fn update(&self, id: Uuid, patch: UpdateNote) -> Result<Option<Note>, ServiceError>;

    /// Mark a note deleted and persist the mark. Returns false when the
    /// note does not exist or is already deleted.
    async fn soft_delete(&self, id: Uuid) -> Result<bool, ServiceError>;
}

/// Pick a store implementation from configuration: PostgreSQL when a
/// database URL is configured, the in-memory store otherwise.
pub async fn init_store(config: &DatabaseConfig) -> anyhow::Result<Arc<dyn NoteStore>> {
    #[cfg(feature = "postgres")]
    if let Some(url) = &config.url {
        let store = postgres::PgNoteStore::connect(url, config).await?;
        return Ok(Arc::new(store));
    }

    #[cfg(not(feature = "postgres"))]
    let _ = config;

    tracing::warn!("no DATABASE_URL configured, using the in-memory note store");
    Ok(Arc::new(memory::MemoryNoteStore::new()))
}
