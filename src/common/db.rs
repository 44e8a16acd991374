// src/common/db.rs
//! SQLite pool construction

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

use super::config::StoreConfig;

/// Open the pool described by the config.
///
/// Creates the parent directory of a file-backed database and the database
/// file itself. Foreign keys are enforced on every connection so that user
/// deletes cascade to accounts and sessions.
pub async fn connect_pool(config: &StoreConfig) -> anyhow::Result<SqlitePool> {
    if let Some(path) = config.sqlite_file_path() {
        let db_path = PathBuf::from(path);
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(connect_options)
        .await?;

    info!(max_connections = config.max_connections, "Database pool ready");
    Ok(pool)
}

/// In-memory pool for tests. Pinned to one connection since every SQLite
/// memory connection is its own database.
#[cfg(test)]
pub(crate) async fn connect_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
}
