//! Splits a byte stream into raw, still-quoted records.
//!
//! The csv reader drops empty lines without a trace. Splitting first keeps
//! them visible so they can be counted and rejected like any other record.

use std::io::{self, BufRead};

use crate::dialect::{Dialect, Quoting, Terminator};

/// Yields the raw bytes of each record, terminator removed.
pub(super) struct RecordSplitter<R> {
    reader: R,
    terminator: u8,
    strip_cr: bool,
    quotechar: Option<u8>,
}

impl<R: BufRead> RecordSplitter<R> {
    pub(super) fn new(reader: R, dialect: &Dialect) -> Self {
        let (terminator, strip_cr) = match dialect.terminator {
            Terminator::Lf | Terminator::CrLf => (b'\n', true),
            Terminator::Byte(b) => (b, false),
        };
        Self {
            reader,
            terminator,
            strip_cr,
            quotechar: (dialect.quoting != Quoting::None).then_some(dialect.quotechar),
        }
    }

    /// Read the next raw record into `out`.
    ///
    /// Returns false at end of input. An empty line yields `true` with
    /// `out` left empty. Terminators inside quotes belong to the field.
    pub(super) fn read_raw(&mut self, out: &mut Vec<u8>) -> io::Result<bool> {
        out.clear();
        let mut in_quotes = false;
        let mut read_any = false;

        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                break;
            }
            read_any = true;

            let mut end = None;
            for (i, &b) in available.iter().enumerate() {
                if Some(b) == self.quotechar {
                    in_quotes = !in_quotes;
                } else if b == self.terminator && !in_quotes {
                    end = Some(i);
                    break;
                }
            }

            match end {
                Some(i) => {
                    out.extend_from_slice(&available[..i]);
                    self.reader.consume(i + 1);
                    break;
                }
                None => {
                    let len = available.len();
                    out.extend_from_slice(available);
                    self.reader.consume(len);
                }
            }
        }

        if self.strip_cr && out.last() == Some(&b'\r') {
            out.pop();
        }
        Ok(read_any)
    }
}
