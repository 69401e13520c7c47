use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;

/// Open the Postgres pool described by the configuration. The pool is owned
/// by the caller; the store layer only borrows it.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;

    info!("Database pool ready ({} connections max)", config.max_connections);
    Ok(pool)
}

/// Ping the database to confirm connectivity.
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// One-time provisioning of the appointments table, run from the CLI rather
/// than at request time. The id column keeps the 36-char UUID string form;
/// a UTF-8 database encoding covers Unicode titles and descriptions.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        "CREATE TABLE IF NOT EXISTS appointments (
            id CHAR(36) PRIMARY KEY,
            title VARCHAR(50) NOT NULL,
            description VARCHAR(255) NOT NULL,
            start_date TIMESTAMPTZ NOT NULL,
            end_date TIMESTAMPTZ NOT NULL,
            creator_id VARCHAR(255) NOT NULL,
            creator_username VARCHAR(255) NOT NULL,
            deleted_at TIMESTAMPTZ
        )",
    )
    .execute(pool)
    .await?;

    info!("appointments table ready");
    Ok(())
}
