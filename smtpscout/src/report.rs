//! Rendering of a [`ScanReport`] for people and for machines.
//!
//! Nothing here touches global color state: every function takes the color
//! decision as an argument and returns a `String`.
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Serialize;
use std::fmt::Write;
use std::io::Write as _;
use termcolor::{Buffer, Color, ColorSpec, WriteColor};

use crate::results::{FileOutcome, ScanReport, ScanTotals};

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.=-]+@[\w.-]+\.\w{2,4}").expect("email pattern is valid"));

const THIN: char = '─';
const THICK: char = '═';

/// Presentation switches for [`render_text`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Emit ANSI colors
    pub color: bool,
    /// Skip the matched records and print the summary only
    pub stats_only: bool,
}

struct Palette {
    color: bool,
}

impl Palette {
    fn paint(&self, text: &str, spec: &ColorSpec) -> String {
        if !self.color {
            return text.to_string();
        }
        let mut buffer = Buffer::ansi();
        // writes into a Vec cannot fail
        let _ = buffer.set_color(spec);
        let _ = buffer.write_all(text.as_bytes());
        let _ = buffer.reset();
        String::from_utf8_lossy(buffer.as_slice()).into_owned()
    }

    fn fg(&self, text: &str, color: Color) -> String {
        self.paint(text, ColorSpec::new().set_fg(Some(color)))
    }

    fn cyan(&self, text: &str) -> String {
        self.fg(text, Color::Cyan)
    }

    fn green(&self, text: &str) -> String {
        self.fg(text, Color::Green)
    }

    fn red(&self, text: &str) -> String {
        self.fg(text, Color::Red)
    }

    fn yellow(&self, text: &str) -> String {
        self.fg(text, Color::Yellow)
    }

    fn highlight(&self, text: &str) -> String {
        self.paint(text, ColorSpec::new().set_fg(Some(Color::Green)).set_bold(true))
    }
}

fn rule(c: char, width: usize) -> String {
    std::iter::repeat(c).take(width).collect()
}

/// Highlights every address in `content`; `target` stands out from the rest.
///
/// Without color the content is returned unchanged.
pub fn highlight_emails(content: &str, target: &str, color: bool) -> String {
    if !color {
        return content.to_string();
    }
    let palette = Palette { color };
    EMAIL
        .replace_all(content, |caps: &Captures| {
            let address = &caps[0];
            if address == target {
                palette.highlight(address)
            } else {
                palette.yellow(address)
            }
        })
        .into_owned()
}

fn write_match(out: &mut String, palette: &Palette, outcome: &FileOutcome, email: &str) {
    let _ = write!(
        out,
        "\n{} Match found in {}",
        palette.green("[✔]"),
        palette.yellow(&outcome.path.display().to_string())
    );
    let _ = writeln!(out, "\n{}", palette.cyan(&rule(THIN, 40)));
    let _ = writeln!(
        out,
        "{}",
        highlight_emails(&outcome.matched_text, email, palette.color)
    );
}

/// Renders the human-readable report
pub fn render_text(report: &ScanReport, email: &str, options: ReportOptions) -> String {
    let palette = Palette {
        color: options.color,
    };
    let totals = report.totals();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{}",
        palette.cyan(&format!("{} SEARCH RESULTS", rule(THIN, 30)))
    );

    if !options.stats_only {
        for outcome in report.matched() {
            write_match(&mut out, &palette, outcome, email);
        }
    }

    let _ = writeln!(out, "\n{}", palette.cyan(&format!("{} SUMMARY", rule(THIN, 35))));
    write_totals(&mut out, &palette, &totals);

    if totals.files_errored > 0 {
        let _ = writeln!(out, "\n{}", palette.red(&format!("{} ERRORS", rule(THIN, 35))));
        for outcome in report.errored() {
            let reason = outcome
                .error
                .as_ref()
                .map(ToString::to_string)
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "{} {} - {}",
                palette.red("[✖]"),
                outcome.path.display(),
                reason
            );
        }
    }

    let _ = writeln!(
        out,
        "\n{} {}",
        palette.cyan("Search target:"),
        palette.green(email)
    );
    let _ = writeln!(out, "{}", rule(THICK, 50));
    out
}

fn write_totals(out: &mut String, palette: &Palette, totals: &ScanTotals) {
    let _ = writeln!(
        out,
        "{} {}",
        palette.cyan("Total files processed:"),
        totals.files_processed
    );
    let _ = writeln!(
        out,
        "{}    {}",
        palette.cyan("Files with matches:"),
        palette.green(&totals.files_matched.to_string())
    );
    let _ = writeln!(
        out,
        "{} {}",
        palette.cyan("Files without matches:"),
        palette.red(&totals.files_unmatched.to_string())
    );
    let _ = writeln!(
        out,
        "{}     {}",
        palette.cyan("Files with errors:"),
        totals.files_errored
    );
    let _ = writeln!(
        out,
        "{} {}",
        palette.cyan("Total records scanned:"),
        totals.total_records
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    outcomes: &'a [FileOutcome],
    totals: ScanTotals,
}

/// Renders all outcomes plus totals as pretty-printed JSON
pub fn render_json(report: &ScanReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        outcomes: &report.outcomes,
        totals: report.totals(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ScanError;
    use std::path::PathBuf;

    fn sample_report() -> ScanReport {
        let mut report = ScanReport::new();
        report.add_outcome(FileOutcome {
            path: PathBuf::from("logs/mail.log"),
            found: true,
            records: 3,
            matched_text: "2024-01-01 10:00:01 from=a@x.com to=b@y.org\n".to_string(),
            error: None,
        });
        report.add_outcome(FileOutcome {
            path: PathBuf::from("logs/quiet.log"),
            records: 2,
            ..Default::default()
        });
        report.add_outcome(FileOutcome::failed(
            "logs/locked.log",
            ScanError::permission_denied("logs/locked.log"),
        ));
        report
    }

    #[test]
    fn test_plain_report_layout() {
        let text = render_text(&sample_report(), "a@x.com", ReportOptions::default());

        assert!(text.contains("SEARCH RESULTS"));
        assert!(text.contains("[✔] Match found in logs/mail.log"));
        assert!(text.contains("from=a@x.com to=b@y.org"));
        assert!(!text.contains("Match found in logs/quiet.log"));
        assert!(text.contains("Total files processed: 3"));
        assert!(text.contains("Files with matches:    1"));
        assert!(text.contains("Files without matches: 1"));
        assert!(text.contains("Files with errors:     1"));
        assert!(text.contains("Total records scanned: 5"));
        assert!(text.contains("[✖] logs/locked.log - Permission denied: logs/locked.log"));
        assert!(text.contains("Search target: a@x.com"));
        assert!(!text.contains('\u{1b}'));
    }

    #[test]
    fn test_stats_only_omits_records() {
        let options = ReportOptions {
            stats_only: true,
            ..Default::default()
        };
        let text = render_text(&sample_report(), "a@x.com", options);
        assert!(!text.contains("Match found"));
        assert!(!text.contains("to=b@y.org"));
        assert!(text.contains("Total records scanned: 5"));
    }

    #[test]
    fn test_no_errors_section_when_clean() {
        let report: ScanReport = vec![FileOutcome::new("a.log")].into_iter().collect();
        let text = render_text(&report, "a@x.com", ReportOptions::default());
        assert!(!text.contains("ERRORS"));
    }

    #[test]
    fn test_highlight_distinguishes_target() {
        let palette = Palette { color: true };
        let out = highlight_emails("from=<a@x.com> to=<b@y.org>", "a@x.com", true);
        assert!(out.contains(&palette.highlight("a@x.com")));
        assert!(out.contains(&palette.yellow("b@y.org")));
        assert_ne!(palette.highlight("a@x.com"), palette.yellow("a@x.com"));
    }

    #[test]
    fn test_color_flag_alone_enables_ansi() {
        let options = ReportOptions {
            color: true,
            ..Default::default()
        };
        let text = render_text(&sample_report(), "a@x.com", options);
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("Match found in"));
    }

    #[test]
    fn test_highlight_without_color_is_identity() {
        let content = "from=<a@x.com> to=<b@y.org>";
        assert_eq!(highlight_emails(content, "a@x.com", false), content);
    }

    #[test]
    fn test_json_report() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totals"]["files_processed"], 3);
        assert_eq!(value["totals"]["total_records"], 5);
        assert_eq!(value["outcomes"].as_array().unwrap().len(), 3);
        assert_eq!(
            value["outcomes"][2]["error"],
            "Permission denied: logs/locked.log"
        );
    }
}
