//! The run context: wires dialect, schema, input, validation, output and
//! stats together for one validation pass.

use std::io::Write;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::dialect::{Dialect, DialectOverrides, Sniffer};
use crate::error::{GristleError, Result};
use crate::input::{InputSource, InputStream};
use crate::output::{Destination, OutputRouter, RouterOptions};
use crate::schema::SchemaDocument;
use crate::stats::RunStats;
use crate::validation::RecordValidator;

/// Everything a run needs, gathered at startup.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Inputs in read order. Empty means standard input.
    pub inputs: Vec<InputSource>,
    /// Manual dialect settings.
    pub overrides: DialectOverrides,
    /// Expected field count (None = taken from the first record).
    pub field_count: Option<usize>,
    /// Schema document to validate against.
    pub schema_path: Option<PathBuf>,
    /// Destination for valid records.
    pub good: Destination,
    /// Destination for invalid records.
    pub bad: Destination,
    /// Sampling, silence and message options.
    pub router: RouterOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            inputs: Vec::new(),
            overrides: DialectOverrides::default(),
            field_count: None,
            schema_path: None,
            good: Destination::Stdout,
            bad: Destination::Stderr,
            router: RouterOptions::default(),
        }
    }
}

/// Establish the dialect for a run.
///
/// A single regular file is sniffed and any overrides applied on top.
/// Standard input, pipes and multiple files cannot be sniffed, so every
/// setting must come from the overrides.
pub fn resolve_dialect(inputs: &[InputSource], overrides: &DialectOverrides) -> Result<Dialect> {
    match inputs {
        [source @ InputSource::File(path)] if source.is_regular_file() => {
            let sniffed = Sniffer::new().sniff_path(path)?;
            Ok(overrides.apply(sniffed))
        }
        [source @ InputSource::File(path)] => {
            path.metadata().map_err(|e| GristleError::io(path, e))?;
            debug!(input = %source, "input is not a regular file, skipping sniff");
            overrides.require_complete()
        }
        _ => overrides.require_complete(),
    }
}

/// State carried through one pass over the records.
#[derive(Debug)]
pub struct ValidationRun {
    validator: RecordValidator,
    stats: RunStats,
}

impl ValidationRun {
    /// Create a run for the given dialect and optional schema.
    pub fn new(dialect: &Dialect, schema: Option<SchemaDocument>, field_count: Option<usize>) -> Self {
        let mut validator = RecordValidator::new(schema, dialect.has_header);
        if let Some(count) = field_count {
            validator = validator.with_field_count(count);
        }
        Self {
            validator,
            stats: RunStats::new(),
        }
    }

    /// Validate and route every record in the stream.
    ///
    /// Invalid records never stop the loop; only read or write failures do.
    pub fn process<W: Write>(
        &mut self,
        stream: &mut InputStream,
        router: &mut OutputRouter<W>,
    ) -> Result<RunStats> {
        while let Some(record) = stream.next_record()? {
            let verdict = self.validator.validate(&record);
            router.route(&record, &verdict)?;
            self.stats.record(&verdict);
        }
        Ok(self.stats)
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    pub fn validator(&self) -> &RecordValidator {
        &self.validator
    }
}

/// Execute a complete run: load the schema, resolve the dialect, open inputs
/// and outputs, then stream every record through validation.
///
/// Setup failures abort before any record is read.
pub fn run(config: &RunConfig) -> Result<RunStats> {
    if config.field_count == Some(0) {
        return Err(GristleError::Config(
            "field count must be greater than zero".to_string(),
        ));
    }

    let schema = config
        .schema_path
        .as_ref()
        .map(SchemaDocument::load)
        .transpose()?;

    let dialect = resolve_dialect(&config.inputs, &config.overrides)?;
    debug!(?dialect, "resolved dialect");

    let mut stream = InputStream::open(config.inputs.clone(), dialect)?;
    let mut router = OutputRouter::open(&config.good, &config.bad, config.router, &dialect)?;

    let mut validation = ValidationRun::new(&dialect, schema, config.field_count);
    let stats = validation.process(&mut stream, &mut router)?;

    let (mut good, mut bad) = router.finish()?;
    good.flush().map_err(|source| GristleError::Output {
        destination: config.good.to_string(),
        source,
    })?;
    bad.flush().map_err(|source| GristleError::Output {
        destination: config.bad.to_string(),
        source,
    })?;

    info!(
        total = stats.total,
        valid = stats.valid,
        invalid = stats.invalid,
        "validation complete"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Quoting, Terminator};
    use std::io::Cursor;

    fn run_on(content: &str, schema: Option<SchemaDocument>, dialect: Dialect) -> (RunStats, String, String) {
        let mut stream = InputStream::from_reader("mem", Cursor::new(content.to_string()), dialect);
        let mut router = OutputRouter::new(
            ("good".to_string(), Vec::new()),
            ("bad".to_string(), Vec::new()),
            RouterOptions {
                errmsg: true,
                ..Default::default()
            },
            &dialect,
        );
        let mut validation = ValidationRun::new(&dialect, schema, None);
        let stats = validation.process(&mut stream, &mut router).unwrap();
        let (good, bad) = router.finish().unwrap();
        (
            stats,
            String::from_utf8(good).unwrap(),
            String::from_utf8(bad).unwrap(),
        )
    }

    #[test]
    fn test_field_count_scenario() {
        let (stats, good, bad) = run_on("a,b,c\n1,2,3\n4,5\n", None, Dialect::default());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.valid, 2);
        assert_eq!(stats.invalid, 1);
        assert_eq!(stats.exit_status().code(), 74);
        assert_eq!(good, "a,b,c\n1,2,3\n");
        assert_eq!(bad, "4,5,\"bad field count - expected 3, got 2\"\n");
    }

    #[test]
    fn test_minimum_scenario() {
        let schema = SchemaDocument::parse("items: [{dg_type: integer, dg_minimum: 0}]").unwrap();
        let (stats, good, bad) = run_on("5\n-1\n", Some(schema), Dialect::default());
        assert_eq!(stats.valid, 1);
        assert_eq!(stats.invalid, 1);
        assert_eq!(good, "5\n");
        assert!(bad.contains("dg_minimum"));
    }

    #[test]
    fn test_empty_stream_is_no_data() {
        let (stats, good, bad) = run_on("", None, Dialect::default());
        assert_eq!(stats, RunStats::default());
        assert_eq!(stats.exit_status().code(), 61);
        assert!(good.is_empty() && bad.is_empty());
    }

    fn complete_overrides() -> DialectOverrides {
        DialectOverrides {
            delimiter: Some(b','),
            quotechar: Some(b'"'),
            quoting: Some(Quoting::Minimal),
            has_header: Some(true),
            terminator: Some(Terminator::Lf),
        }
    }

    #[test]
    fn test_resolve_requires_overrides_for_stdin() {
        let err = resolve_dialect(&[InputSource::Stdin], &DialectOverrides::default()).unwrap_err();
        assert!(matches!(err, GristleError::MissingDialect(_)));

        let dialect = resolve_dialect(&[], &complete_overrides()).unwrap();
        assert!(dialect.has_header);
    }

    #[test]
    fn test_resolve_skips_sniffing_non_regular_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let inputs = [InputSource::File(dir.path().to_path_buf())];

        let err = resolve_dialect(&inputs, &DialectOverrides::default()).unwrap_err();
        assert!(matches!(err, GristleError::MissingDialect(_)));

        let dialect = resolve_dialect(&inputs, &complete_overrides()).unwrap();
        assert_eq!(dialect.delimiter, b',');
    }

    #[test]
    fn test_resolve_missing_file_is_io_error() {
        let inputs = [InputSource::File(PathBuf::from("/no/such/input.csv"))];
        let err = resolve_dialect(&inputs, &complete_overrides()).unwrap_err();
        assert!(matches!(err, GristleError::Io { .. }));
    }

    #[test]
    fn test_blank_line_is_invalid_record() {
        let (stats, good, bad) = run_on("a,b\n\n1,2\n", None, Dialect::default());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.valid, 2);
        assert_eq!(stats.invalid, 1);
        assert_eq!(good, "a,b\n1,2\n");
        assert!(bad.contains("bad field count - expected 2, got 0"));
    }
}
