//! # Schema Migrations
//!
//! The cache schema lives in `migrations/` as timestamped SQL files
//! (`YYYYMMDDHHMMSS_description.sql`) and is embedded at compile time.
//!
//! Tests get a fresh database with the schema applied through
//! `#[sqlx::test(migrator = "menu_sync::database::MIGRATOR")]`.

use sqlx::PgPool;
use tracing::info;

use crate::error::Result;

/// Migrator for the workspace `migrations/` directory
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply outstanding migrations.
///
/// sqlx takes a Postgres advisory lock while migrating, so concurrent
/// callers serialize instead of racing on the DDL.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    info!(
        migrations = MIGRATOR.iter().count(),
        "Database schema is up to date"
    );
    Ok(())
}
