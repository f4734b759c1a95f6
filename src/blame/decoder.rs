use chrono::{DateTime, NaiveDateTime, Utc};
use regex::Regex;

use super::types::BlameLine;

/// Timestamps in blame output are UTC wall-clock values without a zone
/// suffix once the fractional part is stripped.
const SVN_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const LINE_PATTERN: &str = r#"line-number="(.*)""#;
const REVISION_PATTERN: &str = r#"revision="(.*)""#;
const AUTHOR_PATTERN: &str = r"<author>(.*)</author>";
const DATE_PATTERN: &str = r"<date>(.*)T(.*)\.(.*)Z</date>";

/// Which sub-record of an `<entry>` block the decoder is currently inside.
/// `<commit>` and `<merged>` never nest, so a single discriminant replaces
/// a pair of booleans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Commit,
    Merged,
}

/// Streaming decoder for `svn blame --xml --use-merge-history` output.
///
/// The output is conceptually XML but is consumed as plain text, one line
/// at a time, in arrival order. Each line advances a small state machine:
/// a `line-number` attribute starts a new record, `<commit>` and `<merged>`
/// openings select which side the following revision/author/date lines
/// belong to, and `</entry>` finalizes the record. Lines matching none of
/// the known shapes are ignored, which keeps the decoder tolerant of extra
/// attributes, indentation, and truncated input.
pub struct MergeBlameDecoder {
    line_regex: Regex,
    revision_regex: Regex,
    author_regex: Regex,
    date_regex: Regex,

    section: Section,
    line_number: u32,
    committer_revision: String,
    committer: String,
    committer_date: Option<DateTime<Utc>>,
    author_revision: String,
    author: Option<String>,
    author_date: Option<DateTime<Utc>>,

    lines: Vec<BlameLine>,
}

impl MergeBlameDecoder {
    pub fn new() -> Self {
        MergeBlameDecoder {
            line_regex: Regex::new(LINE_PATTERN).expect("Failed to compile line pattern"),
            revision_regex: Regex::new(REVISION_PATTERN)
                .expect("Failed to compile revision pattern"),
            author_regex: Regex::new(AUTHOR_PATTERN).expect("Failed to compile author pattern"),
            date_regex: Regex::new(DATE_PATTERN).expect("Failed to compile date pattern"),
            section: Section::None,
            line_number: 0,
            committer_revision: String::new(),
            committer: String::new(),
            committer_date: None,
            author_revision: String::new(),
            author: None,
            author_date: None,
            lines: Vec::new(),
        }
    }

    /// Feed one line of blame output. Never fails: an unparsable timestamp
    /// is logged and leaves the date unset, and unrecognized lines are
    /// ignored outright.
    ///
    /// Each line matches at most one pattern; the order of the checks below
    /// is load-bearing for malformed input and must not be rearranged.
    pub fn consume_line(&mut self, line: &str) {
        if let Some(caps) = self.line_regex.captures(line) {
            // Reset point between records. A non-numeric capture leaves the
            // previous number in place rather than aborting the parse.
            if let Ok(number) = caps[1].parse() {
                self.line_number = number;
            }
            self.section = Section::None;
        } else if line.contains("<commit") && self.section != Section::Merged {
            // The guard is unreachable for well-formed output (a close
            // marker always resets the section first) but protects against
            // truncated input re-entering commit state mid-merge.
            self.section = Section::Commit;
        } else if line.contains("<merged") {
            self.section = Section::Merged;
        } else if let Some(caps) = self.revision_regex.captures(line) {
            match self.section {
                Section::Commit => self.committer_revision = caps[1].to_string(),
                Section::Merged => self.author_revision = caps[1].to_string(),
                Section::None => {}
            }
        } else if let Some(caps) = self.author_regex.captures(line) {
            match self.section {
                Section::Commit => self.committer = caps[1].to_string(),
                Section::Merged => self.author = Some(caps[1].to_string()),
                Section::None => {}
            }
        } else if let Some(caps) = self.date_regex.captures(line) {
            match self.section {
                Section::Commit => self.committer_date = parse_date_time(&caps[1], &caps[2]),
                Section::Merged => self.author_date = parse_date_time(&caps[1], &caps[2]),
                Section::None => {}
            }
        } else if line.contains("</entry>") {
            self.close_entry();
        }
    }

    /// Records accumulated so far, in encounter order. May be called before
    /// the stream is exhausted; a record still under construction is not
    /// included.
    pub fn lines(&self) -> &[BlameLine] {
        &self.lines
    }

    /// Consume the decoder at end-of-stream, yielding the accumulated
    /// records. A partially-built record with no close marker is dropped.
    pub fn into_lines(self) -> Vec<BlameLine> {
        self.lines
    }

    fn close_entry(&mut self) {
        // An author only exists when a merged section actually produced
        // one; "no merge info" and "merge author equals committer" are
        // distinguished by this being None vs. Some.
        let author = match &self.author {
            Some(author) => {
                tracing::debug!(
                    "line {}: committer {} rev {} ({:?}): author {} rev {} ({:?})",
                    self.line_number,
                    self.committer,
                    self.committer_revision,
                    self.committer_date,
                    author,
                    self.author_revision,
                    self.author_date
                );
                author.clone()
            }
            None => {
                tracing::debug!(
                    "line {}: committer {} rev {} ({:?})",
                    self.line_number,
                    self.committer,
                    self.committer_revision,
                    self.committer_date
                );
                self.committer.clone()
            }
        };

        self.lines.push(BlameLine {
            line_number: self.line_number,
            committer_revision: self.committer_revision.clone(),
            committer: self.committer.clone(),
            committer_date: self.committer_date,
            author,
        });

        self.section = Section::None;
    }
}

/// Parse the date and time halves captured from a `<date>` element as a
/// UTC instant, truncated to whole seconds. Returns `None` (after logging
/// the offending text) when the text does not form a valid timestamp, so a
/// bad date never aborts the parse.
fn parse_date_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let text = format!("{} {}", date, time);
    match NaiveDateTime::parse_from_str(&text, SVN_TIMESTAMP_FORMAT) {
        Ok(naive) => Some(DateTime::from_naive_utc_and_offset(naive, Utc)),
        Err(e) => {
            tracing::error!("skipping unparsable blame date \"{}\": {}", text, e);
            None
        }
    }
}
