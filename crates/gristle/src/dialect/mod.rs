//! CSV dialect description, manual overrides and content sniffing.

mod sniffer;

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{GristleError, Result};

pub use sniffer::{Sniffer, SNIFF_BYTES};

/// How fields are quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Quoting {
    /// Every field is quoted.
    All,
    /// Only fields that need it are quoted.
    Minimal,
    /// Every non-numeric field is quoted.
    NonNumeric,
    /// Quotes carry no meaning.
    None,
}

impl Quoting {
    /// Quote style for writing records in this dialect.
    pub fn quote_style(&self) -> csv::QuoteStyle {
        match self {
            Quoting::All => csv::QuoteStyle::Always,
            Quoting::Minimal => csv::QuoteStyle::Necessary,
            Quoting::NonNumeric => csv::QuoteStyle::NonNumeric,
            Quoting::None => csv::QuoteStyle::Never,
        }
    }
}

impl FromStr for Quoting {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "quote_all" | "all" => Ok(Quoting::All),
            "quote_minimal" | "minimal" => Ok(Quoting::Minimal),
            "quote_nonnumeric" | "quote_non_numeric" | "nonnumeric" => Ok(Quoting::NonNumeric),
            "quote_none" | "none" => Ok(Quoting::None),
            _ => Err(format!(
                "Unknown quoting: {}. Use quote_all, quote_minimal, quote_nonnumeric or quote_none.",
                s
            )),
        }
    }
}

impl fmt::Display for Quoting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quoting::All => write!(f, "quote_all"),
            Quoting::Minimal => write!(f, "quote_minimal"),
            Quoting::NonNumeric => write!(f, "quote_nonnumeric"),
            Quoting::None => write!(f, "quote_none"),
        }
    }
}

/// Record terminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Terminator {
    Lf,
    CrLf,
    Byte(u8),
}

impl Terminator {
    /// Terminator as understood by the csv reader.
    ///
    /// Both line-based terminators split on `\n`; a `\r` before it is
    /// stripped while splitting records.
    pub fn for_reader(&self) -> csv::Terminator {
        match self {
            Terminator::Lf | Terminator::CrLf => csv::Terminator::Any(b'\n'),
            Terminator::Byte(b) => csv::Terminator::Any(*b),
        }
    }

    /// Terminator as emitted by the csv writer.
    pub fn for_writer(&self) -> csv::Terminator {
        match self {
            Terminator::Lf => csv::Terminator::Any(b'\n'),
            Terminator::CrLf => csv::Terminator::CRLF,
            Terminator::Byte(b) => csv::Terminator::Any(*b),
        }
    }
}

impl FromStr for Terminator {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "\n" | "\\n" | "lf" | "LF" => Ok(Terminator::Lf),
            "\r\n" | "\\r\\n" | "crlf" | "CRLF" => Ok(Terminator::CrLf),
            _ => match parse_byte_arg(s) {
                Ok(b'\n') => Ok(Terminator::Lf),
                Ok(b) => Ok(Terminator::Byte(b)),
                Err(_) => Err(format!(
                    "Invalid record delimiter: {:?}. Use \\n, \\r\\n or a single character.",
                    s
                )),
            },
        }
    }
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Lf => write!(f, "\\n"),
            Terminator::CrLf => write!(f, "\\r\\n"),
            Terminator::Byte(b) => write!(f, "{}", (*b as char).escape_default()),
        }
    }
}

/// The syntactic parameters needed to split raw text into records.
///
/// Established once per run and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dialect {
    pub delimiter: u8,
    pub quotechar: u8,
    pub quoting: Quoting,
    pub has_header: bool,
    pub terminator: Terminator,
}

impl Dialect {
    /// Build a csv reader over `input` that yields every row, header included.
    pub fn reader_builder(&self) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quotechar)
            .quoting(self.quoting != Quoting::None)
            .terminator(self.terminator.for_reader())
            .has_headers(false)
            .flexible(true);
        builder
    }

    /// Build a csv writer that emits records in this dialect.
    pub fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quotechar)
            .quote_style(self.quoting.quote_style())
            .terminator(self.terminator.for_writer())
            .has_headers(false)
            .flexible(true);
        builder
    }
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: b',',
            quotechar: b'"',
            quoting: Quoting::Minimal,
            has_header: false,
            terminator: Terminator::Lf,
        }
    }
}

/// Manually supplied dialect settings. Each one wins over a sniffed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DialectOverrides {
    pub delimiter: Option<u8>,
    pub quotechar: Option<u8>,
    pub quoting: Option<Quoting>,
    pub has_header: Option<bool>,
    pub terminator: Option<Terminator>,
}

impl DialectOverrides {
    /// Apply the overrides on top of a sniffed dialect.
    pub fn apply(&self, mut dialect: Dialect) -> Dialect {
        if let Some(d) = self.delimiter {
            dialect.delimiter = d;
        }
        if let Some(q) = self.quotechar {
            dialect.quotechar = q;
        }
        if let Some(q) = self.quoting {
            dialect.quoting = q;
        }
        if let Some(h) = self.has_header {
            dialect.has_header = h;
        }
        if let Some(t) = self.terminator {
            dialect.terminator = t;
        }
        dialect
    }

    /// Build a dialect purely from overrides.
    ///
    /// Fails with every missing setting named when any is absent.
    pub fn require_complete(&self) -> Result<Dialect> {
        let mut missing = Vec::new();
        if self.delimiter.is_none() {
            missing.push("delimiter");
        }
        if self.quotechar.is_none() {
            missing.push("quotechar");
        }
        if self.quoting.is_none() {
            missing.push("quoting");
        }
        if self.has_header.is_none() {
            missing.push("hasheader/hasnoheader");
        }
        if self.terminator.is_none() {
            missing.push("recdelimiter");
        }

        match (
            self.delimiter,
            self.quotechar,
            self.quoting,
            self.has_header,
            self.terminator,
        ) {
            (Some(delimiter), Some(quotechar), Some(quoting), Some(has_header), Some(terminator)) => {
                Ok(Dialect {
                    delimiter,
                    quotechar,
                    quoting,
                    has_header,
                    terminator,
                })
            }
            _ => Err(GristleError::MissingDialect(missing)),
        }
    }
}

/// Parse a single-byte character argument such as a delimiter.
///
/// Accepts a literal character, a backslash escape (`\t`) or a name
/// (`tab`, `comma`, `pipe`, `semicolon`, `colon`, `space`).
pub fn parse_byte_arg(s: &str) -> std::result::Result<u8, String> {
    let byte = match s.to_lowercase().as_str() {
        "tab" | "\\t" => b'\t',
        "comma" => b',',
        "pipe" => b'|',
        "semicolon" => b';',
        "colon" => b':',
        "space" => b' ',
        _ => {
            let bytes = s.as_bytes();
            if bytes.len() != 1 {
                return Err(format!("expected a single character, got {:?}", s));
            }
            bytes[0]
        }
    };
    Ok(byte)
}
