//! Routes each validated record to the "good" or "bad" output.

use std::io::Write;

use crate::dialect::Dialect;
use crate::error::{GristleError, Result};
use crate::input::Record;
use crate::validation::Verdict;

use super::destination::Destination;
use super::sampler::{SampleRate, Sampler};

/// Behavior shared by both outputs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouterOptions {
    /// Sampling for valid records.
    pub good_rate: SampleRate,
    /// Sampling for invalid records.
    pub bad_rate: SampleRate,
    /// Suppress every write. Counting is unaffected.
    pub silent: bool,
    /// Append the failure message to invalid records as a trailing field.
    pub errmsg: bool,
    /// Seed for sampling decisions.
    pub seed: Option<u64>,
}

struct Sink<W: Write> {
    name: String,
    writer: csv::Writer<W>,
    rate: SampleRate,
    written: u64,
}

impl<W: Write> Sink<W> {
    fn new(name: String, inner: W, rate: SampleRate, dialect: &Dialect) -> Self {
        Self {
            name,
            writer: dialect.writer_builder().from_writer(inner),
            rate,
            written: 0,
        }
    }

    fn write<I, T>(&mut self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.writer.write_record(fields)?;
        self.written += 1;
        Ok(())
    }

    fn finish(self) -> Result<W> {
        let name = self.name;
        self.writer
            .into_inner()
            .map_err(|e| GristleError::Output {
                destination: name,
                source: e.into_error(),
            })
    }
}

/// Writes records to two independent outputs in the input's dialect.
pub struct OutputRouter<W: Write = Box<dyn Write>> {
    good: Sink<W>,
    bad: Sink<W>,
    options: RouterOptions,
    sampler: Sampler,
}

impl OutputRouter<Box<dyn Write>> {
    /// Open both destinations, truncating files.
    pub fn open(
        good: &Destination,
        bad: &Destination,
        options: RouterOptions,
        dialect: &Dialect,
    ) -> Result<Self> {
        let good_writer = good.open()?;
        let bad_writer = bad.open()?;
        Ok(Self::new(
            (good.to_string(), good_writer),
            (bad.to_string(), bad_writer),
            options,
            dialect,
        ))
    }
}

impl<W: Write> OutputRouter<W> {
    /// Build a router over already-open writers, each given with a name
    /// used in error messages.
    pub fn new(good: (String, W), bad: (String, W), options: RouterOptions, dialect: &Dialect) -> Self {
        let sampler = match options.seed {
            Some(seed) => Sampler::with_seed(seed),
            None => Sampler::new(),
        };
        Self {
            good: Sink::new(good.0, good.1, options.good_rate, dialect),
            bad: Sink::new(bad.0, bad.1, options.bad_rate, dialect),
            options,
            sampler,
        }
    }

    /// Deliver one record according to its verdict.
    pub fn route(&mut self, record: &Record, verdict: &Verdict) -> Result<()> {
        if self.options.silent {
            return Ok(());
        }

        match verdict {
            Verdict::Valid => {
                if self.sampler.should_write(self.good.rate) {
                    self.good.write(record.fields())?;
                }
            }
            Verdict::Invalid { message } => {
                if self.sampler.should_write(self.bad.rate) {
                    if self.options.errmsg {
                        let fields = record
                            .fields()
                            .iter()
                            .map(String::as_str)
                            .chain(std::iter::once(message.as_str()));
                        self.bad.write(fields)?;
                    } else {
                        self.bad.write(record.fields())?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Records written so far as `(good, bad)`.
    pub fn written(&self) -> (u64, u64) {
        (self.good.written, self.bad.written)
    }

    /// Flush both outputs and hand back the underlying writers.
    pub fn finish(self) -> Result<(W, W)> {
        let good = self.good.finish()?;
        let bad = self.bad.finish()?;
        Ok((good, bad))
    }
}
