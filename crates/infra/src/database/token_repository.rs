//! SQLite-backed session token store.
//!
//! Implements the core [`TokenStore`] port on top of the `fms_tokens` table.
//! Records are only appended; the latest record is the one with the highest
//! id.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use fmdata_core::TokenStore;
use fmdata_domain::{FmDataError, Result as DomainResult, TokenRecord};
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::task;
use tracing::debug;

use super::manager::{map_sql_error, DbManager};

/// SQLite token store sharing the application's [`DbManager`].
pub struct SqliteTokenStore {
    db: Arc<DbManager>,
}

impl SqliteTokenStore {
    /// Store backed by the shared database manager.
    #[must_use]
    pub const fn new(db: Arc<DbManager>) -> Self {
        Self { db }
    }

    /// All stored records, oldest first.
    ///
    /// # Errors
    /// Returns error if the table cannot be read
    pub async fn list(&self) -> DomainResult<Vec<TokenRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Vec<TokenRecord>> {
            let conn = db.get_connection()?;
            query_all(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    /// Number of stored records.
    ///
    /// # Errors
    /// Returns error if the table cannot be read
    pub async fn count(&self) -> DomainResult<u64> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<u64> {
            let conn = db.get_connection()?;
            conn.query_row("SELECT COUNT(*) FROM fms_tokens", [], |row| row.get::<_, i64>(0))
                .map(|count| count.max(0).unsigned_abs())
                .map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }
}

#[async_trait]
impl TokenStore for SqliteTokenStore {
    async fn find_latest(&self) -> DomainResult<Option<TokenRecord>> {
        let db = Arc::clone(&self.db);

        task::spawn_blocking(move || -> DomainResult<Option<TokenRecord>> {
            let conn = db.get_connection()?;
            query_latest(&conn).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)?
    }

    async fn insert(&self, token: &str) -> DomainResult<TokenRecord> {
        let db = Arc::clone(&self.db);
        let token = token.to_string();

        let record = task::spawn_blocking(move || -> DomainResult<TokenRecord> {
            let conn = db.get_connection()?;
            insert_token(&conn, token, Utc::now().timestamp()).map_err(map_sql_error)
        })
        .await
        .map_err(map_join_error)??;

        debug!(record_id = record.id, "session token stored");
        Ok(record)
    }
}

// ============================================================================
// SQL Operations (synchronous)
// ============================================================================

fn query_latest(conn: &Connection) -> rusqlite::Result<Option<TokenRecord>> {
    conn.query_row(
        "SELECT id, token, created_at FROM fms_tokens ORDER BY id DESC LIMIT 1",
        [],
        map_token_row,
    )
    .optional()
}

fn query_all(conn: &Connection) -> rusqlite::Result<Vec<TokenRecord>> {
    let mut stmt = conn.prepare("SELECT id, token, created_at FROM fms_tokens ORDER BY id ASC")?;
    let rows = stmt.query_map([], map_token_row)?;
    rows.collect()
}

fn insert_token(conn: &Connection, token: String, created_at: i64) -> rusqlite::Result<TokenRecord> {
    conn.execute(
        "INSERT INTO fms_tokens (token, created_at) VALUES (?1, ?2)",
        params![token, created_at],
    )?;

    Ok(TokenRecord { id: conn.last_insert_rowid(), token, created_at })
}

fn map_token_row(row: &Row<'_>) -> rusqlite::Result<TokenRecord> {
    Ok(TokenRecord { id: row.get(0)?, token: row.get(1)?, created_at: row.get(2)? })
}

fn map_join_error(err: task::JoinError) -> FmDataError {
    if err.is_cancelled() {
        FmDataError::Internal("blocking task cancelled".into())
    } else {
        FmDataError::Internal(format!("blocking task failed: {err}"))
    }
}
