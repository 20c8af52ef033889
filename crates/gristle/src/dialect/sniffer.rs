//! Dialect inference from file content.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::{debug, warn};

use super::{Dialect, Quoting, Terminator};
use crate::error::{GristleError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|', b':'];

/// Bytes read from the start of a file for analysis.
pub const SNIFF_BYTES: usize = 64 * 1024;

/// Maximum lines considered per analysis.
const SNIFF_LINES: usize = 20;

/// Infers a [`Dialect`] from a sample of file content.
#[derive(Debug, Clone)]
pub struct Sniffer {
    sample_bytes: usize,
}

impl Sniffer {
    /// Create a sniffer with the default sample size.
    pub fn new() -> Self {
        Self {
            sample_bytes: SNIFF_BYTES,
        }
    }

    /// Create a sniffer reading at most `sample_bytes`.
    pub fn with_sample_bytes(sample_bytes: usize) -> Self {
        Self {
            sample_bytes: sample_bytes.max(1),
        }
    }

    /// Sniff the dialect of a file on disk.
    ///
    /// An empty file is reported as [`GristleError::NoData`].
    pub fn sniff_path(&self, path: impl AsRef<Path>) -> Result<Dialect> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GristleError::io(path, e))?;

        let mut sample = Vec::with_capacity(self.sample_bytes.min(SNIFF_BYTES));
        file.take(self.sample_bytes as u64)
            .read_to_end(&mut sample)
            .map_err(|e| GristleError::io(path, e))?;

        let truncated = sample.len() == self.sample_bytes;
        match self.sniff_sample(&sample, truncated) {
            Err(GristleError::NoData(_)) => Err(GristleError::NoData(format!(
                "'{}' is empty",
                path.display()
            ))),
            other => other,
        }
    }

    /// Sniff the dialect of an in-memory sample.
    pub fn sniff_bytes(&self, bytes: &[u8]) -> Result<Dialect> {
        self.sniff_sample(bytes, false)
    }

    fn sniff_sample(&self, bytes: &[u8], truncated: bool) -> Result<Dialect> {
        let text = String::from_utf8_lossy(bytes);
        let mut lines: Vec<&str> = text
            .lines()
            .filter(|l| !l.trim().is_empty())
            .collect();

        // A sample cut short usually ends mid-record
        if truncated && lines.len() > 1 {
            lines.pop();
        }
        lines.truncate(SNIFF_LINES);

        if lines.is_empty() {
            return Err(GristleError::NoData("no records to analyze".to_string()));
        }

        let terminator = if text.contains("\r\n") {
            Terminator::CrLf
        } else {
            Terminator::Lf
        };
        let quotechar = detect_quotechar(&lines);
        let delimiter = detect_delimiter(&lines, quotechar);

        let rows: Vec<Vec<Field>> = lines
            .iter()
            .map(|line| split_line(line, delimiter, quotechar))
            .collect();
        let quoting = detect_quoting(&rows);
        let has_header = detect_header(&rows);

        let dialect = Dialect {
            delimiter,
            quotechar,
            quoting,
            has_header,
            terminator,
        };
        debug!(
            delimiter = %(delimiter as char).escape_default(),
            quoting = %quoting,
            has_header,
            "sniffed dialect"
        );
        Ok(dialect)
    }
}

impl Default for Sniffer {
    fn default() -> Self {
        Self::new()
    }
}

/// A field split from a sample line.
#[derive(Debug)]
struct Field {
    text: String,
    quoted: bool,
}

/// Prefer `"` unless only `'` appears as a leading quote.
fn detect_quotechar(lines: &[&str]) -> u8 {
    let doubles: usize = lines.iter().map(|l| l.matches('"').count()).sum();
    if doubles > 0 {
        return b'"';
    }
    let leading_singles = lines
        .iter()
        .filter(|l| l.trim_start().starts_with('\''))
        .count();
    if leading_singles > 0 { b'\'' } else { b'"' }
}

/// Detect the delimiter by scoring how consistently each candidate appears.
fn detect_delimiter(lines: &[&str], quotechar: u8) -> u8 {
    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim, quotechar))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a slight bonus since
        // it rarely appears inside values
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    if best_score == 0 {
        warn!("no delimiter found in sample, assuming comma");
    }
    best_delimiter
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8, quotechar: u8) -> usize {
    let delim_char = delimiter as char;
    let quote_char = quotechar as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            c if c == quote_char => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

fn split_line(line: &str, delimiter: u8, quotechar: u8) -> Vec<Field> {
    let delim_char = delimiter as char;
    let quote_char = quotechar as char;
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;

    for ch in line.chars() {
        if ch == quote_char {
            if current.is_empty() && !in_quotes {
                quoted = true;
            }
            in_quotes = !in_quotes;
        } else if ch == delim_char && !in_quotes {
            fields.push(Field {
                text: std::mem::take(&mut current),
                quoted,
            });
            quoted = false;
        } else {
            current.push(ch);
        }
    }
    fields.push(Field {
        text: current,
        quoted,
    });
    fields
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.parse::<f64>().is_ok()
}

fn detect_quoting(rows: &[Vec<Field>]) -> Quoting {
    let fields = || rows.iter().flatten();
    let total = fields().count();
    let quoted = fields().filter(|f| f.quoted).count();

    if quoted == 0 {
        Quoting::None
    } else if quoted == total {
        Quoting::All
    } else if fields().all(|f| f.quoted != is_numeric(&f.text)) {
        Quoting::NonNumeric
    } else {
        Quoting::Minimal
    }
}

/// Vote per column on whether the first row looks different from the rest.
fn detect_header(rows: &[Vec<Field>]) -> bool {
    let Some((first, rest)) = rows.split_first() else {
        return false;
    };
    let rest: Vec<&Vec<Field>> = rest.iter().filter(|r| r.len() == first.len()).collect();
    if rest.is_empty() {
        return false;
    }

    let mut votes: i32 = 0;
    for (col, header) in first.iter().enumerate() {
        let values: Vec<&str> = rest.iter().map(|r| r[col].text.as_str()).collect();

        if values.iter().all(|v| is_numeric(v)) {
            votes += if is_numeric(&header.text) { -1 } else { 1 };
            continue;
        }

        let len = values[0].chars().count();
        if values.iter().all(|v| v.chars().count() == len) {
            votes += if header.text.chars().count() == len { -1 } else { 1 };
        }
    }

    votes > 0
}
