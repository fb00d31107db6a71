use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::criteria::SearchCriteria;
use super::record::RecordParser;
use crate::config::EncodingMode;
use crate::errors::ScanError;
use crate::results::FileOutcome;

const BUFFER_CAPACITY: usize = 65536;

/// Rule appended after every matched record (40 box-drawing characters)
pub const MATCH_SEPARATOR: &str = "────────────────────────────────────────";

/// Line iterator over a reader that stops at the first read or decode failure
/// and keeps that failure for the caller.
struct DecodedLines<'a, R> {
    reader: R,
    path: &'a Path,
    encoding_mode: EncodingMode,
    buf: Vec<u8>,
    line_number: usize,
    error: Option<ScanError>,
}

impl<'a, R: BufRead> DecodedLines<'a, R> {
    fn new(reader: R, path: &'a Path, encoding_mode: EncodingMode) -> Self {
        Self {
            reader,
            path,
            encoding_mode,
            buf: Vec::with_capacity(256),
            line_number: 0,
            error: None,
        }
    }

    fn take_error(&mut self) -> Option<ScanError> {
        self.error.take()
    }

    fn decode(&mut self) -> Option<String> {
        match self.encoding_mode {
            EncodingMode::Lossy => Some(String::from_utf8_lossy(&self.buf).into_owned()),
            EncodingMode::FailFast => match String::from_utf8(std::mem::take(&mut self.buf)) {
                Ok(line) => Some(line),
                Err(e) => {
                    self.error = Some(ScanError::encoding_error(self.path, self.line_number, e));
                    None
                }
            },
        }
    }
}

impl<R: BufRead> Iterator for DecodedLines<'_, R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.error.is_some() {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_number += 1;
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                }
                if self.buf.last() == Some(&b'\r') {
                    self.buf.pop();
                }
                self.decode()
            }
            Err(e) => {
                self.error = Some(ScanError::read_failure(self.path, e));
                None
            }
        }
    }
}

/// Scans one log file for records that satisfy a [`SearchCriteria`].
///
/// Processing never fails as a whole: open, read and decode errors are
/// recorded on the returned [`FileOutcome`]. Records parsed before a read
/// failure are kept.
#[derive(Debug, Clone)]
pub struct FileProcessor {
    criteria: SearchCriteria,
    encoding_mode: EncodingMode,
}

impl FileProcessor {
    pub fn new(criteria: SearchCriteria, encoding_mode: EncodingMode) -> Self {
        Self {
            criteria,
            encoding_mode,
        }
    }

    /// Opens and scans the file at `path`
    pub fn process(&self, path: &Path) -> FileOutcome {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return FileOutcome::failed(path, ScanError::open_failure(path, e)),
        };
        self.process_reader(path, BufReader::with_capacity(BUFFER_CAPACITY, file))
    }

    /// Scans an already opened stream, reporting results under `path`
    pub fn process_reader<R: BufRead>(&self, path: &Path, reader: R) -> FileOutcome {
        let mut outcome = FileOutcome::new(path);
        let mut lines = DecodedLines::new(reader, path, self.encoding_mode);

        for record in RecordParser::new(lines.by_ref()) {
            outcome.records += 1;
            if self.criteria.matches(record.text()) {
                outcome.found = true;
                outcome.matched_text.push_str(record.text());
                outcome.matched_text.push('\n');
                outcome.matched_text.push_str(MATCH_SEPARATOR);
                outcome.matched_text.push('\n');
            }
        }

        outcome.error = lines.take_error();
        outcome
    }
}
