//! SQLite-backed durable storage for the session token.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};
use sqlx::Row;
use tokio::sync::Mutex;

use fleetdesk_auth::{TOKEN_KEY, TokenStore};

/// Key/value table in a local SQLite file; the token lives under
/// [`TOKEN_KEY`].
#[derive(Debug, Clone)]
pub struct SqliteTokenStore {
    path: PathBuf,
    /// Opened on first use.
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn pool(&self) -> anyhow::Result<SqlitePool> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create token directory at {parent:?}"))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&self.path)
            .create_if_missing(true);

        let pool = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("failed to open token database at {:?}", self.path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT PRIMARY KEY NOT NULL,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_store table")?;

        tracing::debug!(path = ?self.path, "token database ready");

        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn load(&self) -> anyhow::Result<Option<String>> {
        let pool = self.pool().await?;

        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?1")
            .bind(TOKEN_KEY)
            .fetch_optional(&pool)
            .await
            .context("failed to read stored token")?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    async fn save(&self, token: Option<&str>) -> anyhow::Result<()> {
        let pool = self.pool().await?;

        match token {
            Some(token) => {
                sqlx::query(
                    r#"
                    INSERT INTO kv_store (key, value, updated_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(key) DO UPDATE SET
                        value = excluded.value,
                        updated_at = excluded.updated_at
                    "#,
                )
                .bind(TOKEN_KEY)
                .bind(token)
                .bind(Utc::now().to_rfc3339())
                .execute(&pool)
                .await
                .context("failed to store token")?;
            }
            None => {
                sqlx::query("DELETE FROM kv_store WHERE key = ?1")
                    .bind(TOKEN_KEY)
                    .execute(&pool)
                    .await
                    .context("failed to delete stored token")?;
            }
        }
        Ok(())
    }
}
