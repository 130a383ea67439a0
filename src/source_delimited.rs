//! Delimited-table catalog source (CSV/TSV-style).
//!
//! First line is the header row. Fields may be `"`-quoted; quoted fields may
//! contain the delimiter, and embedded quotes are doubled (`""`). Lines that
//! fail to yield a named record are skipped: a partially malformed file
//! still contributes every record it could parse.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::models::SourceRecord;
use crate::normalize::coalesce_record;

/// Parse a delimited source file into records. Errors only on I/O; record
/// level problems are skipped.
pub fn scan_delimited(path: &Path, delimiter: char) -> Result<Vec<SourceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    Ok(parse_delimited(&content, delimiter))
}

/// Parse delimited table content. The header row names the columns; each
/// following line is zipped against the headers and coalesced.
pub fn parse_delimited(content: &str, delimiter: char) -> Vec<SourceRecord> {
    let mut lines = content.lines();

    let headers: Vec<String> = match lines.next() {
        Some(header_line) => split_fields(header_line, delimiter)
            .into_iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            continue;
        }

        let fields = split_fields(line, delimiter);
        let mut map = Map::new();
        for (header, field) in headers.iter().zip(fields) {
            if header.is_empty() {
                continue;
            }
            map.insert(header.clone(), Value::String(field));
        }

        if let Some(record) = coalesce_record(&map) {
            records.push(record);
        } else {
            log::debug!("skipping delimited line without a name: {:?}", line);
        }
    }

    records
}

/// Split one line into fields, honoring `"` quoting and doubled quotes.
/// Always terminates; an unbalanced quote consumes to end of line.
fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_table() {
        let content = "name,type,thc\nBlue Dream,hybrid,17.5\nOG Kush,indica,19\n";
        let records = parse_delimited(content, ',');
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "Blue Dream");
        assert_eq!(records[0].kind.as_deref(), Some("hybrid"));
        assert_eq!(records[0].thc, Some(17.5));
        assert_eq!(records[1].name, "OG Kush");
    }

    #[test]
    fn test_quoted_field_contains_delimiter() {
        let content = "name,description\n\"Gelato\",\"Sweet, creamy, dessert-like\"\n";
        let records = parse_delimited(content, ',');
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].description.as_deref(),
            Some("Sweet, creamy, dessert-like")
        );
    }

    #[test]
    fn test_doubled_quotes() {
        let content = "name,notes\nJack Herer,\"The \"\"emperor\"\" strain\"\n";
        let records = parse_delimited(content, ',');
        assert_eq!(records[0].description.as_deref(), Some("The \"emperor\" strain"));
    }

    #[test]
    fn test_malformed_lines_do_not_abort() {
        let content = "name,thc\nBlue Dream,17\n,20\n\"Unterminated,5\nSour Diesel,22\n";
        let records = parse_delimited(content, ',');
        // The nameless line drops, the unterminated-quote line swallows to EOL
        // and still parses as a (nameless or odd) field set, the rest survive.
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert!(names.contains(&"Blue Dream"));
        assert!(names.contains(&"Sour Diesel"));
    }

    #[test]
    fn test_synonym_headers() {
        let content = "strain\tthc_percent\nMaui Wowie\t16%\n";
        let records = parse_delimited(content, '\t');
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Maui Wowie");
        assert_eq!(records[0].thc, Some(16.0));
    }

    #[test]
    fn test_empty_content() {
        assert!(parse_delimited("", ',').is_empty());
        assert!(parse_delimited("name,type\n", ',').is_empty());
    }

    #[test]
    fn test_short_row_zips_against_headers() {
        let content = "name,type,thc\nCheese\n";
        let records = parse_delimited(content, ',');
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Cheese");
        assert_eq!(records[0].kind, None);
    }
}
