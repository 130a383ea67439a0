//! Core data models used throughout Strain Scout.
//!
//! These types represent the records that flow through the catalog pipeline
//! (normalize → dedupe → import) and the per-request identification pipeline
//! (match → normalize confidence → resolve).

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Raw record produced by a source-file parser before deduplication.
///
/// No identity beyond its fields; consumed once by the deduplicator.
#[derive(Debug, Clone, Default)]
pub struct SourceRecord {
    pub name: String,
    pub kind: Option<String>,
    pub description: Option<String>,
    pub effects: Vec<String>,
    pub flavors: Vec<String>,
    pub lineage: Vec<String>,
    pub thc: Option<f64>,
    pub cbd: Option<f64>,
}

impl SourceRecord {
    /// Minimal record carrying only a name (plain name-list sources).
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// Deduplicated catalog entry, keyed by `slug`.
///
/// List-valued fields are ordered sets so the serialized catalog artifact is
/// byte-stable across runs and diffable between pipeline runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalStrainRecord {
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub description: Option<String>,
    pub effects: BTreeSet<String>,
    pub flavors: BTreeSet<String>,
    pub lineage: BTreeSet<String>,
    pub thc: Option<f64>,
    pub cbd: Option<f64>,
}

/// Best visual match produced by the perceptual-hash matcher.
///
/// `confidence` here is already unit-scaled hash similarity in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchCandidate {
    pub name: String,
    pub confidence: f64,
}

/// A visual match as it arrives on the resolution boundary.
///
/// Carries either a unit-scaled `confidence` or a legacy `score` on a
/// `[0, 200]` scale, depending on which matcher produced it. Normalized in
/// one place by [`crate::confidence::normalize`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualMatch {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// A text-derived strain-name signal (packaging OCR, label OCR, AI summary).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextInsights {
    #[serde(default)]
    pub strain_name: Option<String>,
}

/// Everything known about one identification request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionInput {
    #[serde(default)]
    pub packaging_insights: Option<TextInsights>,
    #[serde(default)]
    pub label_insights: Option<TextInsights>,
    /// Visual matches ordered highest similarity first.
    #[serde(default)]
    pub visual_matches: Vec<VisualMatch>,
    #[serde(default)]
    pub ai_summary: Option<TextInsights>,
    #[serde(default)]
    pub is_packaged_product: bool,
}

/// Which signal the resolution engine settled on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionSource {
    Packaging,
    PackagedUnknown,
    Visual,
    Ai,
    None,
}

impl std::fmt::Display for ResolutionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResolutionSource::Packaging => "packaging",
            ResolutionSource::PackagedUnknown => "packaged-unknown",
            ResolutionSource::Visual => "visual",
            ResolutionSource::Ai => "ai",
            ResolutionSource::None => "none",
        };
        f.write_str(s)
    }
}

/// Final answer for one identification request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionResult {
    pub name: String,
    pub source: ResolutionSource,
    pub confidence: f64,
}

/// Aggregate counters reported at the end of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub ok: u64,
    pub updated_by_fallback_key: u64,
    pub fail: u64,
    pub db_count: i64,
}
