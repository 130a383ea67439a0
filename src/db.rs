//! SQLite connection handling for the strain store.
//!
//! The store is a single local database file. The pool stays small: the
//! importer writes strictly sequentially and every read path is a cheap
//! point query.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::config::Config;

/// Open a pool against the configured strain store, creating the database
/// file and its parent directory on first use.
pub async fn open(config: &Config) -> Result<SqlitePool> {
    let store_path = &config.db.path;

    if let Some(parent) = store_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create store directory: {}", parent.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(store_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open strain store: {}", store_path.display()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CatalogConfig, DbConfig, ImportConfig};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_creates_store_and_parent_directory() {
        let tmp = TempDir::new().unwrap();
        let config = Config {
            db: DbConfig {
                path: tmp.path().join("nested/data/strains.sqlite"),
            },
            catalog: CatalogConfig {
                output: tmp.path().join("catalog.json"),
                sources: Vec::new(),
            },
            matcher: None,
            import: ImportConfig::default(),
        };

        let pool = open(&config).await.unwrap();
        sqlx::query("SELECT 1").execute(&pool).await.unwrap();
        pool.close().await;

        assert!(config.db.path.exists());
    }
}
