//! Catalog build orchestration: normalize all configured sources, dedupe
//! into the canonical catalog, and write the JSON artifact.
//!
//! Deduplication is keyed on the slug derived from each record's name.
//! First write wins: later records for a seen slug are discarded whole, with
//! no field-level merging (a deliberate determinism choice).
//! Given the same source files in the same order, the artifact is
//! byte-identical across runs.

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::config::{Config, SourceFormat, SourceFileConfig};
use crate::models::{CanonicalStrainRecord, SourceRecord};
use crate::normalize::slugify;
use crate::source_delimited::scan_delimited;
use crate::source_json::scan_json;
use crate::source_names::scan_names;

/// A source file that failed to parse as a whole. The file contributes zero
/// records; the run continues.
#[derive(Debug)]
pub struct FileError {
    pub file: String,
    pub error: String,
}

/// Outcome of a catalog build, with every input record's fate accounted for:
/// kept, deduplicated away, unsluggable, or lost with its failed file.
#[derive(Debug, Default)]
pub struct CatalogBuild {
    pub catalog: Vec<CanonicalStrainRecord>,
    /// Records parsed across all sources (before dedup).
    pub parsed: usize,
    /// Later records discarded because their slug was already taken.
    pub duplicates: usize,
    /// Records whose name yields an empty slug (cannot be keyed).
    pub unsluggable: usize,
    pub file_errors: Vec<FileError>,
}

/// Convert one source record into its canonical form.
pub fn canonicalize(record: SourceRecord) -> CanonicalStrainRecord {
    CanonicalStrainRecord {
        slug: slugify(&record.name),
        name: record.name,
        kind: record.kind,
        description: record.description,
        effects: record.effects.into_iter().collect(),
        flavors: record.flavors.into_iter().collect(),
        lineage: record.lineage.into_iter().collect(),
        thc: record.thc,
        cbd: record.cbd,
    }
}

/// Merge an ordered record sequence into the canonical catalog,
/// first-write-wins per slug, preserving first-insertion order.
pub fn dedupe(records: Vec<SourceRecord>) -> (Vec<CanonicalStrainRecord>, usize, usize) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut catalog = Vec::new();
    let mut duplicates = 0usize;
    let mut unsluggable = 0usize;

    for record in records {
        let canonical = canonicalize(record);
        if canonical.slug.is_empty() {
            log::warn!("dropping record with unsluggable name: {:?}", canonical.name);
            unsluggable += 1;
            continue;
        }
        if seen.insert(canonical.slug.clone()) {
            catalog.push(canonical);
        } else {
            duplicates += 1;
        }
    }

    (catalog, duplicates, unsluggable)
}

/// Run the Normalizer + Deduplicator over every configured source, in config
/// order. Sources that fail to read or parse are reported and skipped.
pub fn build_catalog(config: &Config) -> CatalogBuild {
    let mut all_records: Vec<SourceRecord> = Vec::new();
    let mut file_errors = Vec::new();

    for source in &config.catalog.sources {
        match scan_source(source) {
            Ok(records) => all_records.extend(records),
            Err(err) => {
                log::warn!("source {} failed: {:#}", source.path.display(), err);
                file_errors.push(FileError {
                    file: source.path.display().to_string(),
                    error: format!("{:#}", err),
                });
            }
        }
    }

    let parsed = all_records.len();
    let (catalog, duplicates, unsluggable) = dedupe(all_records);

    CatalogBuild {
        catalog,
        parsed,
        duplicates,
        unsluggable,
        file_errors,
    }
}

fn scan_source(source: &SourceFileConfig) -> Result<Vec<SourceRecord>> {
    match source.format {
        SourceFormat::Delimited => scan_delimited(&source.path, source.delimiter),
        SourceFormat::Names => scan_names(&source.path),
        SourceFormat::Json => scan_json(&source.path),
    }
}

/// The `scout catalog` command: build and (unless dry-run) write the
/// canonical catalog artifact, then print a run summary.
pub fn run_catalog(config: &Config, dry_run: bool) -> Result<()> {
    let build = build_catalog(config);

    if dry_run {
        println!("catalog (dry-run)");
        print_accounting(config, &build);
        return Ok(());
    }

    let output = &config.catalog.output;
    if let Some(parent) = output.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create catalog directory: {}", parent.display()))?;
    }

    let mut json = serde_json::to_string_pretty(&build.catalog)?;
    json.push('\n');
    std::fs::write(output, json)
        .with_context(|| format!("Failed to write catalog artifact: {}", output.display()))?;

    println!("catalog");
    print_accounting(config, &build);
    println!("  wrote: {}", output.display());
    println!("ok");

    Ok(())
}

/// Record-fate accounting, identical for real and dry runs: every parsed
/// record lands in exactly one of the printed buckets.
fn print_accounting(config: &Config, build: &CatalogBuild) {
    println!("  sources:           {}", config.catalog.sources.len());
    println!("  records parsed:    {}", build.parsed);
    println!("  canonical records: {}", build.catalog.len());
    println!("  duplicates:        {}", build.duplicates);
    if build.unsluggable > 0 {
        println!("  unsluggable:       {}", build.unsluggable);
    }
    for fe in &build.file_errors {
        println!("  failed source: {} ({})", fe.file, fe.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str) -> SourceRecord {
        SourceRecord::named(name)
    }

    #[test]
    fn test_first_write_wins() {
        let mut first = rec("Blue Dream");
        first.thc = Some(17.0);
        let mut second = rec("blue dream"); // same slug
        second.thc = Some(99.0);

        let (catalog, duplicates, _) = dedupe(vec![first, second]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(duplicates, 1);
        assert_eq!(catalog[0].name, "Blue Dream");
        assert_eq!(catalog[0].thc, Some(17.0));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (catalog, _, _) = dedupe(vec![rec("Zeta"), rec("Alpha"), rec("Zeta"), rec("Mango")]);
        let slugs: Vec<&str> = catalog.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["zeta", "alpha", "mango"]);
    }

    #[test]
    fn test_unsluggable_dropped() {
        let (catalog, duplicates, unsluggable) = dedupe(vec![rec("★☆★"), rec("OG Kush")]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(duplicates, 0);
        assert_eq!(unsluggable, 1);
    }

    #[test]
    fn test_dedupe_idempotent_byte_identical() {
        let input = || {
            vec![
                rec("Blue Dream"),
                rec("Açaí"),
                rec("blue-dream"),
                rec("OG Kush"),
            ]
        };
        let (a, _, _) = dedupe(input());
        let (b, _, _) = dedupe(input());

        let json_a = serde_json::to_string_pretty(&a).unwrap();
        let json_b = serde_json::to_string_pretty(&b).unwrap();
        assert_eq!(json_a, json_b);
    }

    #[test]
    fn test_canonicalize_sets_are_sorted() {
        let mut record = rec("Gelato");
        record.effects = vec!["sleepy".into(), "happy".into(), "happy".into()];
        let canonical = canonicalize(record);
        let effects: Vec<&str> = canonical.effects.iter().map(|s| s.as_str()).collect();
        assert_eq!(effects, vec!["happy", "sleepy"]);
    }
}
