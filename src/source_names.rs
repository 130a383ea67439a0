//! Plain name-list catalog source: one strain name per line.

use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SourceRecord;

pub fn scan_names(path: &Path) -> Result<Vec<SourceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    Ok(parse_names(&content))
}

/// Each non-empty trimmed line becomes a minimal record.
pub fn parse_names(content: &str) -> Vec<SourceRecord> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(SourceRecord::named)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_name_per_line() {
        let records = parse_names("Blue Dream\nOG Kush\n\n  Sour Diesel  \n");
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Blue Dream", "OG Kush", "Sour Diesel"]);
    }

    #[test]
    fn test_minimal_records_have_no_extras() {
        let records = parse_names("Gelato\n");
        assert_eq!(records.len(), 1);
        assert!(records[0].kind.is_none());
        assert!(records[0].effects.is_empty());
        assert!(records[0].thc.is_none());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_names("").is_empty());
        assert!(parse_names("\n   \n").is_empty());
    }
}
