//! Concatenates one or more inputs into a single record sequence.

use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::record::Record;
use super::splitter::RecordSplitter;
use crate::dialect::Dialect;
use crate::error::{GristleError, Result};

/// Where records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// Parse a command-line argument; `-` means standard input.
    pub fn from_arg(arg: &str) -> Self {
        if arg == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(PathBuf::from(arg))
        }
    }

    /// Whether this input is a regular file that can be sniffed before
    /// reading. Pipes, FIFOs and standard input cannot be read twice.
    pub fn is_regular_file(&self) -> bool {
        match self {
            InputSource::Stdin => false,
            InputSource::File(path) => path.metadata().is_ok_and(|m| m.is_file()),
        }
    }
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => write!(f, "<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

enum Pending {
    Source(InputSource),
    Reader(String, Box<dyn Read>),
}

/// A flat, ordered stream of records spanning several inputs.
///
/// Inputs are opened strictly one after another. The record counter keeps
/// running across input boundaries. An empty line is a record with no
/// fields.
pub struct InputStream {
    pending: VecDeque<Pending>,
    dialect: Dialect,
    parser: csv::ReaderBuilder,
    current: Option<RecordSplitter<BufReader<Box<dyn Read>>>>,
    current_name: String,
    record_count: u64,
    file_record_count: u64,
    raw: Vec<u8>,
    buffer: csv::ByteRecord,
}

impl InputStream {
    /// Create a stream over files and/or standard input.
    ///
    /// Every named input must exist up front so a missing one aborts the
    /// run before any record is processed. Named pipes and process
    /// substitutions are accepted alongside regular files.
    pub fn open(sources: Vec<InputSource>, dialect: Dialect) -> Result<Self> {
        let sources = if sources.is_empty() {
            vec![InputSource::Stdin]
        } else {
            sources
        };

        for source in &sources {
            if let InputSource::File(path) = source {
                check_exists(path)?;
            }
        }

        Ok(Self::with_pending(
            sources.into_iter().map(Pending::Source).collect(),
            dialect,
        ))
    }

    /// Create a stream over an in-memory or otherwise pre-opened reader.
    pub fn from_reader(name: impl Into<String>, reader: impl Read + 'static, dialect: Dialect) -> Self {
        let mut pending = VecDeque::new();
        pending.push_back(Pending::Reader(name.into(), Box::new(reader)));
        Self::with_pending(pending, dialect)
    }

    fn with_pending(pending: VecDeque<Pending>, dialect: Dialect) -> Self {
        Self {
            pending,
            parser: dialect.reader_builder(),
            dialect,
            current: None,
            current_name: String::new(),
            record_count: 0,
            file_record_count: 0,
            raw: Vec::new(),
            buffer: csv::ByteRecord::new(),
        }
    }

    /// The dialect records are split with.
    pub fn dialect(&self) -> &Dialect {
        &self.dialect
    }

    /// Records read so far across all inputs.
    pub fn record_count(&self) -> u64 {
        self.record_count
    }

    /// Name of the input currently being read.
    pub fn current_name(&self) -> &str {
        &self.current_name
    }

    /// Read the next record, advancing to the next input when one runs dry.
    ///
    /// Returns `Ok(None)` once every input is exhausted.
    pub fn next_record(&mut self) -> Result<Option<Record>> {
        loop {
            if self.current.is_none() && !self.advance()? {
                return Ok(None);
            }
            let Some(splitter) = self.current.as_mut() else {
                continue;
            };

            let more = splitter
                .read_raw(&mut self.raw)
                .map_err(|e| GristleError::io(&self.current_name, e))?;
            if more {
                self.record_count += 1;
                self.file_record_count += 1;
                let fields = self.parse_raw()?;
                return Ok(Some(Record::new(
                    fields,
                    self.record_count,
                    self.file_record_count,
                )));
            }

            debug!(
                input = %self.current_name,
                records = self.file_record_count,
                "input exhausted"
            );
            self.current = None;
        }
    }

    /// Split the current raw record into fields.
    fn parse_raw(&mut self) -> Result<Vec<String>> {
        if self.raw.is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = self.parser.from_reader(self.raw.as_slice());
        if !reader.read_byte_record(&mut self.buffer)? {
            return Ok(Vec::new());
        }
        Ok(self
            .buffer
            .iter()
            .map(|f| String::from_utf8_lossy(f).into_owned())
            .collect())
    }

    /// Open the next pending input. Returns false when none remain.
    fn advance(&mut self) -> Result<bool> {
        let Some(next) = self.pending.pop_front() else {
            return Ok(false);
        };

        let (name, reader): (String, Box<dyn Read>) = match next {
            Pending::Source(InputSource::Stdin) => {
                ("<stdin>".to_string(), Box::new(io::stdin().lock()))
            }
            Pending::Source(InputSource::File(path)) => {
                let file = File::open(&path).map_err(|e| GristleError::io(&path, e))?;
                (path.display().to_string(), Box::new(file))
            }
            Pending::Reader(name, reader) => (name, reader),
        };

        debug!(input = %name, "opened input");
        self.current = Some(RecordSplitter::new(BufReader::new(reader), &self.dialect));
        self.current_name = name;
        self.file_record_count = 0;
        Ok(true)
    }
}

fn check_exists(path: &Path) -> Result<()> {
    path.metadata()
        .map(|_| ())
        .map_err(|e| GristleError::io(path, e))
}

impl Iterator for InputStream {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record().transpose()
    }
}
