//! Structured JSON catalog source.
//!
//! Source dumps arrive in wildly different container shapes: a bare array of
//! strain objects, an object wrapping the array under some key, or several
//! layers of nesting. The flattener does not assume any shape: it scans every
//! value, treats the elements of any array it finds as candidate records, and
//! descends into non-array objects looking for more arrays.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::SourceRecord;
use crate::normalize::coalesce_record;

pub fn scan_json(path: &Path) -> Result<Vec<SourceRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read source file: {}", path.display()))?;
    let value: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON source: {}", path.display()))?;
    Ok(flatten_records(&value))
}

/// Flatten any nested JSON container into a flat record sequence.
/// Traversal order follows the document, so output order is stable.
pub fn flatten_records(value: &Value) -> Vec<SourceRecord> {
    let mut records = Vec::new();
    collect(value, &mut records);
    records
}

fn collect(value: &Value, out: &mut Vec<SourceRecord>) {
    match value {
        Value::Array(items) => {
            for item in items {
                candidate(item, out);
            }
        }
        Value::Object(map) => {
            for nested in map.values() {
                collect(nested, out);
            }
        }
        _ => {}
    }
}

/// An array element is a candidate record: objects are coalesced, strings
/// become minimal name-only records, nested containers are descended into.
fn candidate(item: &Value, out: &mut Vec<SourceRecord>) {
    match item {
        Value::Object(map) => {
            if let Some(record) = coalesce_record(map) {
                out.push(record);
            } else {
                // Not itself a record; it may still wrap one.
                collect(item, out);
            }
        }
        Value::String(s) => {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                out.push(SourceRecord::named(trimmed));
            }
        }
        Value::Array(_) => collect(item, out),
        _ => {}
    }
}
