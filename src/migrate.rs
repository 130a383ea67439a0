//! Schema creation for the strain store. Idempotent; `scout init` may be run
//! any number of times.

use anyhow::Result;

use crate::config::Config;
use crate::db;

pub async fn run_migrations(config: &Config) -> Result<()> {
    let pool = db::open(config).await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS strains (
            slug TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            kind TEXT,
            description TEXT,
            effects TEXT NOT NULL DEFAULT '[]',
            flavors TEXT NOT NULL DEFAULT '[]',
            lineage TEXT NOT NULL DEFAULT '[]',
            thc REAL,
            cbd REAL,
            updated_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(&pool)
    .await?;

    // Case-insensitive uniqueness on name, distinct from the slug key.
    // Violations of this index are the importer's recoverable conflict case.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_strains_name_nocase
            ON strains (name COLLATE NOCASE)
        "#,
    )
    .execute(&pool)
    .await?;

    pool.close().await;
    Ok(())
}
