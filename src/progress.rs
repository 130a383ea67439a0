//! Import progress reporting.
//!
//! The importer emits an advisory checkpoint every fixed batch of records so
//! long-running imports stay observable. Checkpoints carry the running
//! counters; they are not part of the correctness contract. Progress is
//! emitted on **stderr** so stdout remains parseable for scripts.

use std::io::Write;

/// A snapshot of the importer's running counters at a checkpoint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImportCheckpoint {
    pub processed: u64,
    pub total: u64,
    pub ok: u64,
    pub updated_by_fallback_key: u64,
    pub fail: u64,
}

/// Reports import progress. The importer owns no ambient counters; it hands
/// each checkpoint to whatever reporter the caller injected.
pub trait ImportProgressReporter: Send + Sync {
    fn report(&self, checkpoint: ImportCheckpoint);
}

/// Human-friendly progress on stderr:
/// "import  1,250 / 4,800 records  (ok 1,248, renamed 2, failed 0)".
pub struct StderrProgress;

impl ImportProgressReporter for StderrProgress {
    fn report(&self, cp: ImportCheckpoint) {
        let line = format!(
            "import  {} / {} records  (ok {}, renamed {}, failed {})\n",
            format_count(cp.processed),
            format_count(cp.total),
            format_count(cp.ok),
            format_count(cp.updated_by_fallback_key),
            format_count(cp.fail),
        );
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
        let _ = std::io::stderr().lock().flush();
    }
}

/// No-op reporter when progress is disabled (and for tests).
pub struct NoProgress;

impl ImportProgressReporter for NoProgress {
    fn report(&self, _checkpoint: ImportCheckpoint) {}
}

/// Group a record count into comma-separated thousands for the checkpoint
/// line. Counts stay well under u64 range; no locale handling.
fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut groups: Vec<&str> = Vec::new();
    let mut end = digits.len();
    while end > 3 {
        groups.push(&digits[end - 3..end]);
        end -= 3;
    }
    groups.push(&digits[..end]);
    groups.reverse();
    groups.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_grouping() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(42), "42");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(12_345), "12,345");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
