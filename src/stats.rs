//! Store and catalog overview.
//!
//! A quick summary of what's loaded: strain row count, catalog artifact
//! size, and reference-set size. Used by `scout stats` to give confidence
//! that catalog builds and imports are working as expected.

use anyhow::Result;

use crate::config::Config;
use crate::db;
use crate::matcher::ReferenceSet;

/// Run the stats command: query the store and print a summary.
pub async fn run_stats(config: &Config) -> Result<()> {
    let pool = db::open(config).await?;

    let total_strains: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM strains")
        .fetch_one(&pool)
        .await?;

    let db_size = std::fs::metadata(&config.db.path)
        .map(|m| m.len())
        .unwrap_or(0);

    let artifact = &config.catalog.output;
    let artifact_size = std::fs::metadata(artifact).map(|m| m.len()).ok();

    println!("Strain Scout — Store Stats");
    println!("==========================");
    println!();
    println!("  Database:    {}", config.db.path.display());
    println!("  Size:        {}", format_bytes(db_size));
    println!("  Strains:     {}", total_strains);
    println!();
    match artifact_size {
        Some(size) => println!(
            "  Catalog:     {} ({})",
            artifact.display(),
            format_bytes(size)
        ),
        None => println!("  Catalog:     {} (not built)", artifact.display()),
    }

    match &config.matcher {
        Some(matcher_config) => match ReferenceSet::load(matcher_config) {
            Ok(set) => println!("  References:  {} images", set.len()),
            Err(err) => println!("  References:  unavailable ({})", err),
        },
        None => println!("  References:  matcher not configured"),
    }

    println!();

    pool.close().await;
    Ok(())
}

/// Format a byte count as a human-readable string.
fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else if bytes < 1024 * 1024 * 1024 {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    } else {
        format!("{:.2} GB", bytes as f64 / (1024.0 * 1024.0 * 1024.0))
    }
}
