// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup the embedded SQLite pool and schema

use crate::config::Config;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;

/// Initialize SQLite connection pool
/// DOCUMENTATION: Creates the pool, the database file and the schema
/// Called once during application startup in main.rs
/// Returns pool that is used for all database operations
pub async fn init_db_pool(config: &Config) -> Result<SqlitePool, sqlx::Error> {
    log::info!("Initializing database pool: {}", config.database_url);

    let options = SqliteConnectOptions::from_str(&config.database_url)?
        // First run creates the database file
        .create_if_missing(true)
        // WAL keeps concurrent request handlers from blocking each other
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        // Maximum concurrent connections
        .max_connections(config.db_max_connections)
        // Timeout waiting for connection from pool
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        .connect_with(options)
        .await?;

    // Verify connection works
    sqlx::query("SELECT 1").execute(&pool).await?;

    create_schema(&pool).await?;

    log::info!("Database pool initialized successfully");
    Ok(pool)
}

/// Create the photos table and its queue indexes if absent
/// DOCUMENTATION: Idempotent, runs on every startup
pub async fn create_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS photos (
            name                        TEXT PRIMARY KEY,
            event                       TEXT NOT NULL,
            original_url                TEXT NOT NULL,
            enhanced_url                TEXT NOT NULL,
            compressed_url              TEXT NOT NULL,
            enhanced_and_compressed_url TEXT NOT NULL,
            tech_review                 TEXT NOT NULL DEFAULT 'pending',
            caption                     TEXT NOT NULL DEFAULT 'pending',
            created_at                  TEXT NOT NULL,
            updated_at                  TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // The review queues filter on these two columns
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_tech_review ON photos (tech_review)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_photos_caption ON photos (caption)")
        .execute(pool)
        .await?;

    Ok(())
}
