//! Record boundary detection.
//!
//! A record starts at a line beginning with `YYYY-MM-DD HH:MM:SS` and runs up
//! to the next such line or the end of input. Lines seen before the first
//! header are not discarded; they form a separate leading record.
use once_cell::sync::Lazy;
use regex::Regex;

static RECORD_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2} [0-9]{2}:[0-9]{2}:[0-9]{2}")
        .expect("record-start pattern is valid")
});

/// Returns true if `line` opens a new record
pub fn is_record_start(line: &str) -> bool {
    RECORD_START.is_match(line)
}

/// One multi-line log entry, newline-terminated lines joined in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    text: String,
}

impl LogRecord {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl AsRef<str> for LogRecord {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

/// Splits a stream of lines into [`LogRecord`]s in a single forward pass.
///
/// Input lines must not carry their terminator; each one is stored with a
/// trailing `\n`.
pub struct RecordParser<I> {
    lines: I,
    buffer: String,
    done: bool,
}

impl<I, S> RecordParser<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            buffer: String::new(),
            done: false,
        }
    }

    fn take_buffer(&mut self) -> LogRecord {
        LogRecord {
            text: std::mem::take(&mut self.buffer),
        }
    }
}

impl<I, S> Iterator for RecordParser<I>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    type Item = LogRecord;

    fn next(&mut self) -> Option<LogRecord> {
        if self.done {
            return None;
        }

        for line in self.lines.by_ref() {
            let line = line.as_ref();
            let flushed = if is_record_start(line) && !self.buffer.is_empty() {
                Some(std::mem::take(&mut self.buffer))
            } else {
                None
            };
            self.buffer.push_str(line);
            self.buffer.push('\n');
            if let Some(text) = flushed {
                return Some(LogRecord { text });
            }
        }

        self.done = true;
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.take_buffer())
        }
    }
}
