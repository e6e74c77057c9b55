use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use super::{notes_table, NoteStore};
use crate::config::DatabaseConfig;
use crate::errors::ServiceError;
use crate::models::{Note, UpdateNote};

/// PostgreSQL-backed note store.
///
/// Uses runtime-checked queries; the table name comes from the explicit
/// naming convention, so it is interpolated rather than bound.
pub struct PgNoteStore {
    pool: PgPool,
    table: String,
}

impl PgNoteStore {
    pub async fn connect(url: &str, config: &DatabaseConfig) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_millis(config.acquire_timeout_ms))
            .connect(url)
            .await?;

        super::schema::run_migrations(&pool).await?;

        Ok(Self {
            pool,
            table: notes_table(),
        })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn create(&self, title: String, body: Option<String>) -> Result<Note, ServiceError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO {} (id, title, body, deleted, created_at, updated_at) \
             VALUES ($1, $2, $3, FALSE, $4, $4) \
             RETURNING id, title, body, deleted, created_at, updated_at",
            self.table
        );

        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(Uuid::new_v4())
            .bind(title)
            .bind(body)
            .bind(now)
            .fetch_one(&self.pool)
            .await?;

        Ok(note)
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<(Vec<Note>, i64), ServiceError> {
        let sql = format!(
            "SELECT id, title, body, deleted, created_at, updated_at FROM {} \
             WHERE NOT deleted ORDER BY created_at, id LIMIT $1 OFFSET $2",
            self.table
        );
        let notes = sqlx::query_as::<_, Note>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        let count_sql = format!("SELECT COUNT(*) FROM {} WHERE NOT deleted", self.table);
        let total: i64 = sqlx::query_scalar(&count_sql).fetch_one(&self.pool).await?;

        Ok((notes, total))
    }

    async fn retrieve(&self, id: Uuid) -> Result<Option<Note>, ServiceError> {
        let sql = format!(
            "SELECT id, title, body, deleted, created_at, updated_at FROM {} \
             WHERE id = $1 AND NOT deleted",
            self.table
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(note)
    }

    async fn update(&self, id: Uuid, patch: UpdateNote) -> Result<Option<Note>, ServiceError> {
        let sql = format!(
            "UPDATE {} SET title = COALESCE($2, title), body = COALESCE($3, body), \
             updated_at = $4 WHERE id = $1 AND NOT deleted \
             RETURNING id, title, body, deleted, created_at, updated_at",
            self.table
        );
        let note = sqlx::query_as::<_, Note>(&sql)
            .bind(id)
            .bind(patch.title)
            .bind(patch.body)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        Ok(note)
    }

    async fn soft_delete(&self, id: Uuid) -> Result<bool, ServiceError> {
        let sql = format!(
            "UPDATE {} SET deleted = TRUE, updated_at = $2 WHERE id = $1 AND NOT deleted",
            self.table
        );
        let result = sqlx::query(&sql)
            .bind(id)
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
