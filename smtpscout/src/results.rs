//! Per-file outcomes and the aggregated scan report.
use serde::{Serialize, Serializer};
use std::path::PathBuf;

use crate::errors::ScanError;

/// Result of scanning a single log file.
///
/// When `error` is set from an open failure the remaining fields are zero.
/// A read failure keeps whatever was accumulated before the stream broke.
#[derive(Debug, Default, Serialize)]
pub struct FileOutcome {
    /// The file that was scanned
    pub path: PathBuf,
    /// Whether at least one record satisfied the criteria
    pub found: bool,
    /// Number of records parsed from the file, matching or not
    pub records: usize,
    /// Matched records in file order, each followed by a separator rule
    pub matched_text: String,
    /// Open, read or decode failure for this file
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<ScanError>,
}

fn serialize_error<S: Serializer>(
    error: &Option<ScanError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl FileOutcome {
    /// Creates an empty outcome for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Creates an outcome for a file that could not be opened
    pub fn failed(path: impl Into<PathBuf>, error: ScanError) -> Self {
        Self {
            path: path.into(),
            error: Some(error),
            ..Default::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    pub fn is_match(&self) -> bool {
        self.error.is_none() && self.found
    }
}

/// Totals derived from a set of outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanTotals {
    pub files_processed: usize,
    pub files_matched: usize,
    pub files_unmatched: usize,
    pub files_errored: usize,
    pub total_records: usize,
}

/// All outcomes of one scan, in completion order unless sorted.
#[derive(Debug, Default)]
pub struct ScanReport {
    pub outcomes: Vec<FileOutcome>,
}

impl ScanReport {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_outcome(&mut self, outcome: FileOutcome) {
        self.outcomes.push(outcome);
    }

    /// Orders outcomes by file path for deterministic output
    pub fn sort_by_path(&mut self) {
        self.outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn totals(&self) -> ScanTotals {
        let mut totals = ScanTotals {
            files_processed: self.outcomes.len(),
            ..Default::default()
        };
        for outcome in &self.outcomes {
            totals.total_records += outcome.records;
            if outcome.is_error() {
                totals.files_errored += 1;
            } else if outcome.found {
                totals.files_matched += 1;
            } else {
                totals.files_unmatched += 1;
            }
        }
        totals
    }

    pub fn matched(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_match())
    }

    pub fn errored(&self) -> impl Iterator<Item = &FileOutcome> {
        self.outcomes.iter().filter(|o| o.is_error())
    }
}

impl FromIterator<FileOutcome> for ScanReport {
    fn from_iter<T: IntoIterator<Item = FileOutcome>>(iter: T) -> Self {
        Self {
            outcomes: iter.into_iter().collect(),
        }
    }
}
