//! Visual similarity matching against the reference image set.
//!
//! The reference set is discovered under `matcher.reference_root` and sorted
//! by relative path before fingerprinting, so ranking and tie-breaks are
//! deterministic across runs and platforms (directory enumeration order is
//! not guaranteed by the filesystem). Fingerprints are computed once at load
//! and cached for the life of the set; `best_match` is read-only and safe to
//! call concurrently.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use image::DynamicImage;
use walkdir::WalkDir;

use crate::confidence;
use crate::config::{Config, MatcherConfig};
use crate::dhash::Fingerprint;
use crate::models::MatchCandidate;

/// One reference image with its cached fingerprint.
#[derive(Debug, Clone)]
pub struct ReferenceImage {
    pub name: String,
    pub path: PathBuf,
    pub fingerprint: Fingerprint,
}

/// The loaded, fingerprinted reference image set.
pub struct ReferenceSet {
    images: Vec<ReferenceImage>,
}

impl ReferenceSet {
    /// Scan the reference root, fingerprint every matching image, and build
    /// the set. Unreadable or undecodable files are skipped with a warning;
    /// they never abort the load.
    pub fn load(config: &MatcherConfig) -> Result<Self> {
        let root = &config.reference_root;
        if !root.exists() {
            anyhow::bail!("Reference root does not exist: {}", root.display());
        }

        let include_set = build_globset(&config.include_globs)?;

        let mut paths: Vec<(String, PathBuf)> = Vec::new();
        for entry in WalkDir::new(root) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("skipping unreadable reference entry: {}", err);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            let relative = path.strip_prefix(root).unwrap_or(path);
            let rel_str = relative.to_string_lossy().to_string();
            if include_set.is_match(&rel_str) {
                paths.push((rel_str, path.to_path_buf()));
            }
        }

        // Sort for deterministic ordering (and therefore stable tie-breaks).
        paths.sort_by(|a, b| a.0.cmp(&b.0));

        let mut images = Vec::with_capacity(paths.len());
        for (rel_str, path) in paths {
            let image = match image::open(&path) {
                Ok(img) => img,
                Err(err) => {
                    log::warn!("skipping unreadable reference image {}: {}", rel_str, err);
                    continue;
                }
            };
            images.push(ReferenceImage {
                name: display_name(&path),
                fingerprint: Fingerprint::from_image(&image),
                path,
            });
        }

        Ok(Self { images })
    }

    /// Build a set from already-decoded images. Order is preserved.
    pub fn from_images(named: Vec<(String, DynamicImage)>) -> Self {
        let images = named
            .into_iter()
            .map(|(name, image)| ReferenceImage {
                name,
                path: PathBuf::new(),
                fingerprint: Fingerprint::from_image(&image),
            })
            .collect();
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Rank the reference set against a query image and return the single
    /// best candidate. The query fingerprint is computed once; reference
    /// fingerprints come from the cache. Ties keep the first-encountered
    /// reference (set order is fixed at load). Empty set yields `None`.
    pub fn best_match(&self, query: &DynamicImage) -> Option<MatchCandidate> {
        let query_fp = Fingerprint::from_image(query);

        let mut best: Option<(&ReferenceImage, f64)> = None;
        for reference in &self.images {
            let similarity = query_fp.similarity(&reference.fingerprint);
            match best {
                Some((_, best_similarity)) if similarity <= best_similarity => {}
                _ => best = Some((reference, similarity)),
            }
        }

        best.map(|(reference, similarity)| MatchCandidate {
            name: reference.name.clone(),
            confidence: similarity,
        })
    }
}

/// The `scout match` command: rank the reference set against a query image
/// and print the best candidate with its confidence tier.
pub fn run_match(config: &Config, image_path: &Path) -> Result<()> {
    let matcher_config = config
        .matcher
        .as_ref()
        .ok_or_else(|| anyhow::anyhow!("Matcher not configured (missing [matcher] section)"))?;

    let set = ReferenceSet::load(matcher_config)?;
    if set.is_empty() {
        println!("No reference images.");
        return Ok(());
    }

    let query = image::open(image_path)
        .with_context(|| format!("Failed to decode query image: {}", image_path.display()))?;

    match set.best_match(&query) {
        Some(candidate) => {
            let tier = confidence::classify(Some(candidate.confidence));
            println!("{}", candidate.name);
            println!("  confidence: {:.4}", candidate.confidence);
            println!("  tier:       {}", tier);
        }
        None => println!("No match."),
    }

    Ok(())
}

/// Derive a human-readable candidate name from a reference file name:
/// `blue-dream.jpg` → `Blue Dream`.
fn display_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    stem.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern).with_context(|| format!("Bad glob: {}", pattern))?);
    }
    Ok(builder.build()?)
}
