//! Catalog import: upsert the canonical catalog into the strain store.
//!
//! Records are processed strictly sequentially, in catalog order, so counter
//! attribution stays unambiguous. A record's failure never blocks another's
//! import: the run always finishes and reports aggregate counters. The only
//! fatal condition is a missing catalog artifact: the run must not proceed
//! with partial or garbage input.
//!
//! Conflict handling: the store enforces a case-insensitive unique index on
//! `name`, distinct from the `slug` primary key. When an upsert trips that
//! index, the record is recovered through an update addressed by exact name
//! match instead of being failed.

use std::collections::BTreeSet;

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db;
use crate::models::{CanonicalStrainRecord, ImportSummary};
use crate::progress::{ImportCheckpoint, ImportProgressReporter};

/// Run a full import of the canonical catalog artifact into the store.
pub async fn run_import(
    config: &Config,
    reporter: &dyn ImportProgressReporter,
) -> Result<ImportSummary> {
    let artifact = &config.catalog.output;
    let content = std::fs::read_to_string(artifact).with_context(|| {
        format!(
            "Canonical catalog not found: {} (run `scout catalog` first)",
            artifact.display()
        )
    })?;
    let catalog: Vec<CanonicalStrainRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse catalog artifact: {}", artifact.display()))?;

    let pool = db::open(config).await?;
    let summary = import_records(&pool, &catalog, config.import.progress_every, reporter).await?;

    println!("import");
    println!("  catalog records:     {}", catalog.len());
    println!("  ok:                  {}", summary.ok);
    println!("  updated by name key: {}", summary.updated_by_fallback_key);
    println!("  failed:              {}", summary.fail);
    println!("  store count:         {}", summary.db_count);
    if summary.db_count != catalog.len() as i64 {
        println!(
            "  note: store count {} differs from catalog size {}",
            summary.db_count,
            catalog.len()
        );
    }
    println!("ok");

    pool.close().await;
    Ok(summary)
}

/// Import records one by one, emitting a progress checkpoint every
/// `progress_every` records (zero is treated as one). Returns the aggregate
/// counters plus the store's reported row count.
pub async fn import_records(
    pool: &SqlitePool,
    catalog: &[CanonicalStrainRecord],
    progress_every: usize,
    reporter: &dyn ImportProgressReporter,
) -> Result<ImportSummary> {
    let now = chrono::Utc::now().timestamp();
    let total = catalog.len() as u64;
    let checkpoint_interval = progress_every.max(1) as u64;

    let mut ok = 0u64;
    let mut updated_by_fallback_key = 0u64;
    let mut fail = 0u64;

    for (i, record) in catalog.iter().enumerate() {
        match upsert_strain(pool, record, now).await {
            Ok(()) => ok += 1,
            Err(err) if is_name_conflict(&err) => {
                match update_by_name(pool, record, now).await {
                    Ok(rows) => {
                        if rows == 0 {
                            log::warn!(
                                "fallback update for '{}' matched no row by exact name",
                                record.name
                            );
                        }
                        updated_by_fallback_key += 1;
                    }
                    Err(err) => {
                        log::warn!("fallback update failed for '{}': {}", record.slug, err);
                        fail += 1;
                    }
                }
            }
            Err(err) => {
                log::warn!("upsert failed for '{}': {}", record.slug, err);
                fail += 1;
            }
        }

        let processed = (i + 1) as u64;
        if processed % checkpoint_interval == 0 {
            reporter.report(ImportCheckpoint {
                processed,
                total,
                ok,
                updated_by_fallback_key,
                fail,
            });
        }
    }

    let db_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strains")
        .fetch_one(pool)
        .await?;

    Ok(ImportSummary {
        ok,
        updated_by_fallback_key,
        fail,
        db_count,
    })
}

async fn upsert_strain(
    pool: &SqlitePool,
    record: &CanonicalStrainRecord,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO strains (slug, name, kind, description, effects, flavors, lineage, thc, cbd, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(slug) DO UPDATE SET
            name = excluded.name,
            kind = excluded.kind,
            description = excluded.description,
            effects = excluded.effects,
            flavors = excluded.flavors,
            lineage = excluded.lineage,
            thc = excluded.thc,
            cbd = excluded.cbd,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&record.slug)
    .bind(&record.name)
    .bind(&record.kind)
    .bind(&record.description)
    .bind(set_json(&record.effects))
    .bind(set_json(&record.flavors))
    .bind(set_json(&record.lineage))
    .bind(record.thc)
    .bind(record.cbd)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(())
}

/// Recovery path for name-index conflicts: update the existing row addressed
/// by exact `name` match. Returns the number of rows affected.
async fn update_by_name(
    pool: &SqlitePool,
    record: &CanonicalStrainRecord,
    now: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE strains SET
            kind = ?,
            description = ?,
            effects = ?,
            flavors = ?,
            lineage = ?,
            thc = ?,
            cbd = ?,
            updated_at = ?
        WHERE name = ?
        "#,
    )
    .bind(&record.kind)
    .bind(&record.description)
    .bind(set_json(&record.effects))
    .bind(set_json(&record.flavors))
    .bind(set_json(&record.lineage))
    .bind(record.thc)
    .bind(record.cbd)
    .bind(now)
    .bind(&record.name)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Only violations of the case-insensitive name index are recoverable;
/// everything else counts as a failure.
fn is_name_conflict(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => {
            let message = db_err.message();
            message.contains("idx_strains_name_nocase") || message.contains("strains.name")
        }
        _ => false,
    }
}

fn set_json(set: &BTreeSet<String>) -> String {
    serde_json::to_string(set).unwrap_or_else(|_| "[]".to_string())
}
