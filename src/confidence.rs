//! Confidence normalization and tier classification.
//!
//! Visual matches arrive on two scales: unit-scaled hash similarity in
//! `[0, 1]`, or a legacy integer score on `[0, 200]` from the older matcher.
//! Both are mapped onto one `[0, 1]` confidence here, and nowhere else.
//!
//! The tier thresholds are a fixed external contract: downstream consumers
//! branch on tier, not on the raw value. They live in constants and must
//! not drift.

use serde::{Deserialize, Serialize};

use crate::models::VisualMatch;

const LEGACY_SCORE_MAX: f64 = 200.0;

pub const TIER_HIGH_FLOOR: f64 = 0.9;
pub const TIER_MEDIUM_FLOOR: f64 = 0.7;

/// Map a raw match onto the unit confidence scale.
///
/// Returns `None` when neither field carries a usable number. `None` means
/// "no signal" and is distinct from `Some(0.0)`, which means "signal present
/// but worthless".
pub fn normalize(raw: &VisualMatch) -> Option<f64> {
    if let Some(confidence) = raw.confidence.filter(|c| c.is_finite()) {
        return Some(confidence.clamp(0.0, 1.0));
    }
    if let Some(score) = raw.score.filter(|s| s.is_finite()) {
        return Some(score.clamp(0.0, LEGACY_SCORE_MAX) / LEGACY_SCORE_MAX);
    }
    None
}

/// Confidence quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    None,
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Tier::None => "none",
            Tier::Low => "low",
            Tier::Medium => "medium",
            Tier::High => "high",
        };
        f.write_str(s)
    }
}

/// Bucket a normalized confidence into its tier. Missing values are treated
/// as 0. Boundaries are inclusive on the lower side of each tier.
pub fn classify(normalized: Option<f64>) -> Tier {
    let value = normalized.unwrap_or(0.0);
    if value < 0.0 {
        Tier::None
    } else if value >= TIER_HIGH_FLOOR {
        Tier::High
    } else if value >= TIER_MEDIUM_FLOOR {
        Tier::Medium
    } else if value > 0.0 {
        Tier::Low
    } else {
        Tier::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_confidence(c: f64) -> VisualMatch {
        VisualMatch {
            name: "x".to_string(),
            confidence: Some(c),
            score: None,
        }
    }

    fn with_score(s: f64) -> VisualMatch {
        VisualMatch {
            name: "x".to_string(),
            confidence: None,
            score: Some(s),
        }
    }

    #[test]
    fn test_normalize_confidence_clamped() {
        assert_eq!(normalize(&with_confidence(1.5)), Some(1.0));
        assert_eq!(normalize(&with_confidence(-1.0)), Some(0.0));
        assert_eq!(normalize(&with_confidence(0.62)), Some(0.62));
    }

    #[test]
    fn test_normalize_legacy_score() {
        assert_eq!(normalize(&with_score(200.0)), Some(1.0));
        assert_eq!(normalize(&with_score(100.0)), Some(0.5));
        assert_eq!(normalize(&with_score(500.0)), Some(1.0));
        assert_eq!(normalize(&with_score(-10.0)), Some(0.0));
    }

    #[test]
    fn test_normalize_no_signal_is_none() {
        let raw = VisualMatch {
            name: "x".to_string(),
            confidence: None,
            score: None,
        };
        assert_eq!(normalize(&raw), None);
        assert_eq!(normalize(&with_confidence(f64::NAN)), None);
    }

    #[test]
    fn test_confidence_outranks_legacy_score() {
        let raw = VisualMatch {
            name: "x".to_string(),
            confidence: Some(0.3),
            score: Some(200.0),
        };
        assert_eq!(normalize(&raw), Some(0.3));
    }

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify(Some(0.9)), Tier::High);
        assert_eq!(classify(Some(0.89999)), Tier::Medium);
        assert_eq!(classify(Some(0.7)), Tier::Medium);
        assert_eq!(classify(Some(0.0001)), Tier::Low);
        assert_eq!(classify(Some(0.0)), Tier::None);
        assert_eq!(classify(Some(1.0)), Tier::High);
    }

    #[test]
    fn test_classify_null_and_negative() {
        assert_eq!(classify(None), Tier::None);
        assert_eq!(classify(Some(-0.5)), Tier::None);
    }
}
