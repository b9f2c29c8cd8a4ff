use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from a backing store
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Table definitions, applied in order at startup. Todos carry no foreign key
/// to boards: the board handler removes them before deleting the board.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        uid            TEXT PRIMARY KEY,
        email          TEXT NOT NULL DEFAULT '',
        display_name   TEXT NOT NULL DEFAULT '',
        email_verified BOOLEAN NOT NULL DEFAULT FALSE,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS boards (
        id          UUID PRIMARY KEY,
        title       TEXT NOT NULL CHECK (title <> ''),
        description TEXT NOT NULL DEFAULT '',
        color       TEXT NOT NULL,
        user_id     TEXT NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS boards_user_created_idx ON boards (user_id, created_at DESC)",
    r#"CREATE TABLE IF NOT EXISTS todos (
        id          UUID PRIMARY KEY,
        title       TEXT NOT NULL CHECK (title <> ''),
        description TEXT NOT NULL DEFAULT '',
        board_id    UUID NOT NULL,
        user_id     TEXT NOT NULL,
        priority    TEXT NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high')),
        completed   BOOLEAN NOT NULL DEFAULT FALSE,
        due_date    TIMESTAMPTZ,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )"#,
    "CREATE INDEX IF NOT EXISTS todos_board_created_idx ON todos (board_id, created_at DESC)",
    "CREATE INDEX IF NOT EXISTS todos_user_idx ON todos (user_id)",
];

/// Open the connection pool described by the config
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
    let url = config
        .url
        .as_deref()
        .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connection_timeout))
        .connect(url)
        .await?;

    info!("Created database pool (max {} connections)", config.max_connections);
    Ok(pool)
}

/// Create tables and indexes that do not exist yet
pub async fn bootstrap_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn connect_requires_database_url() {
        let config = crate::config::AppConfig::development().database;
        let err = connect(&config).await.unwrap_err();
        assert!(matches!(err, DatabaseError::ConfigMissing("DATABASE_URL")));
    }

    #[test]
    fn schema_statements_are_idempotent() {
        for statement in SCHEMA {
            assert!(statement.contains("IF NOT EXISTS"), "not idempotent: {}", statement);
        }
    }
}
