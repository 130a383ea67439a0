//! Canonical strain-name resolution.
//!
//! A pure, total function from [`ResolutionInput`] to [`ResolutionResult`]:
//! no I/O, no hidden state, and no error path. Unresolvable inputs land on
//! the "unknown" terminal outcome instead of failing.
//!
//! The precedence table below is the load-bearing contract of the whole
//! identification feature. Order and thresholds must not change:
//!
//! 1. Packaged product: packaging text → label text → AI text; visual
//!    matches are never consulted (a label photograph is a more reliable
//!    ground truth for a manufactured product than any appearance match).
//! 2. Raw flower: the top visual match, when its confidence clears the
//!    floor.
//! 3. AI free-text inference, at a fixed capped confidence.
//! 4. Unknown.

use crate::confidence;
use crate::models::{ResolutionInput, ResolutionResult, ResolutionSource, TextInsights};

/// Minimum confidence for visual-only evidence to assert a strain name.
/// A precision/recall trade-off: below this, a visual match is too
/// unreliable to name a specific strain.
pub const VISUAL_CONFIDENCE_FLOOR: f64 = 0.6;

/// Fixed confidence assigned to AI free-text inference, reflecting that it
/// is lower-trust than packaging text or a qualifying visual match.
pub const AI_CONFIDENCE: f64 = 0.4;

/// Terminal name when no signal resolves.
pub const UNKNOWN_STRAIN: &str = "Cannabis (strain unknown)";

/// Resolve one identification request to a single canonical name, source
/// tag, and confidence.
pub fn resolve(input: &ResolutionInput) -> ResolutionResult {
    if input.is_packaged_product {
        let name = text_name(&input.packaging_insights)
            .or_else(|| text_name(&input.label_insights))
            .or_else(|| text_name(&input.ai_summary));

        return match name {
            Some(name) => ResolutionResult {
                name,
                source: ResolutionSource::Packaging,
                confidence: 1.0,
            },
            None => ResolutionResult {
                name: UNKNOWN_STRAIN.to_string(),
                source: ResolutionSource::PackagedUnknown,
                confidence: 0.0,
            },
        };
    }

    // Raw flower: only the top-ranked visual candidate is considered.
    if let Some(top) = input.visual_matches.first() {
        if let Some(conf) = confidence::normalize(top) {
            if conf >= VISUAL_CONFIDENCE_FLOOR && !top.name.trim().is_empty() {
                return ResolutionResult {
                    name: top.name.trim().to_string(),
                    source: ResolutionSource::Visual,
                    confidence: conf,
                };
            }
        }
    }

    if let Some(name) = text_name(&input.ai_summary) {
        return ResolutionResult {
            name,
            source: ResolutionSource::Ai,
            confidence: AI_CONFIDENCE,
        };
    }

    ResolutionResult {
        name: UNKNOWN_STRAIN.to_string(),
        source: ResolutionSource::None,
        confidence: 0.0,
    }
}

/// The `scout resolve` command: read a `ResolutionInput` JSON document from
/// a file (or stdin when the path is `-`) and print the result as JSON.
pub fn run_resolve(input_path: &str) -> anyhow::Result<()> {
    use anyhow::Context;

    let content = if input_path == "-" {
        let mut buf = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)
            .context("Failed to read resolution input from stdin")?;
        buf
    } else {
        std::fs::read_to_string(input_path)
            .with_context(|| format!("Failed to read resolution input: {}", input_path))?
    };

    let input: ResolutionInput =
        serde_json::from_str(&content).context("Failed to parse resolution input JSON")?;

    let result = resolve(&input);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// A text signal resolves only to a non-empty trimmed name.
fn text_name(insights: &Option<TextInsights>) -> Option<String> {
    insights
        .as_ref()
        .and_then(|i| i.strain_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}
