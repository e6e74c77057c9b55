use anyhow::{Context, Result};
use sqlx::PgPool;
use tracing::info;

use super::notes_table;

const MIGRATION_SQL: &str = include_str!("../../migrations/001_initial_schema.sql");

/// Apply the embedded migrations. The SQL carries a `{table}` placeholder
/// filled from the explicit naming convention.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    info!("Running database migrations...");

    let sql = MIGRATION_SQL.replace("{table}", &notes_table());

    for (i, statement) in sql.split(';').enumerate() {
        let trimmed = statement.trim();
        if trimmed.is_empty() || trimmed.starts_with("--") {
            continue;
        }

        sqlx::query(trimmed)
            .execute(pool)
            .await
            .with_context(|| format!("Failed to execute migration statement {}", i + 1))?;
    }

    info!("Database migrations completed successfully");
    Ok(())
}
