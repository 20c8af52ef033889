//! CLI argument definitions using clap.

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use std::path::PathBuf;

use gristle::dialect::parse_byte_arg;
use gristle::{
    Destination, DialectOverrides, InputSource, Quoting, RouterOptions, RunConfig, SampleRate,
    Terminator,
};

/// Validate delimited records, writing valid ones to one output and invalid
/// ones to another.
///
/// Exit codes: 0 all records valid, 1 error, 61 no data, 74 invalid data.
#[derive(Parser, Debug)]
#[command(name = "gristle_validator")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input files; `-` reads standard input
    #[arg(value_name = "FILE", default_value = "-")]
    pub files: Vec<String>,

    /// Destination for valid records (`-` = stdout)
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub outgood: String,

    /// Destination for invalid records (`-` = stderr)
    #[arg(long, value_name = "PATH", default_value = "-")]
    pub outerr: String,

    /// Expected number of fields per record (default: taken from the first record)
    #[arg(short = 'f', long, value_name = "N", value_parser = parse_field_count)]
    pub fieldcnt: Option<usize>,

    /// Field delimiter, e.g. `,`, `tab`, `\t`, `pipe`
    #[arg(short = 'd', long, value_parser = parse_byte_arg)]
    pub delimiter: Option<u8>,

    /// Quoting style: quote_all, quote_minimal, quote_nonnumeric, quote_none
    #[arg(long)]
    pub quoting: Option<Quoting>,

    /// Quote character
    #[arg(long, value_parser = parse_byte_arg)]
    pub quotechar: Option<u8>,

    /// Record terminator: `\n`, `\r\n` or a single character
    #[arg(long)]
    pub recdelimiter: Option<Terminator>,

    /// The first record of each file is a header
    #[arg(long, conflicts_with = "hasnoheader")]
    pub hasheader: bool,

    /// Files have no header record
    #[arg(long)]
    pub hasnoheader: bool,

    /// Schema document (YAML or JSON) to validate fields against
    #[arg(long, value_name = "PATH")]
    pub validschema: Option<PathBuf>,

    /// Print record counts when finished
    #[arg(long)]
    pub stats: bool,

    /// Format for --stats
    #[arg(long, value_enum, default_value_t = StatsFormat::Text)]
    pub stats_format: StatsFormat,

    /// Write no records; counts and exit code are unaffected
    #[arg(long)]
    pub silent: bool,

    /// Percentage of records to write, 0-100 (-1 writes all)
    #[arg(
        long,
        value_name = "PCT",
        default_value = "-1",
        allow_hyphen_values = true,
        value_parser = parse_sample_rate
    )]
    pub randomout: SampleRate,

    /// Append the failure message to each invalid record
    #[arg(long)]
    pub errmsg: bool,

    /// Seed for --randomout sampling, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormatArg::Compact)]
    pub log_format: LogFormatArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatsFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl Cli {
    /// Header setting from the two mutually exclusive flags.
    pub fn has_header(&self) -> Option<bool> {
        if self.hasheader {
            Some(true)
        } else if self.hasnoheader {
            Some(false)
        } else {
            None
        }
    }

    /// Build the library run configuration.
    pub fn run_config(&self) -> RunConfig {
        RunConfig {
            inputs: self.files.iter().map(|f| InputSource::from_arg(f)).collect(),
            overrides: DialectOverrides {
                delimiter: self.delimiter,
                quotechar: self.quotechar,
                quoting: self.quoting,
                has_header: self.has_header(),
                terminator: self.recdelimiter,
            },
            field_count: self.fieldcnt,
            schema_path: self.validschema.clone(),
            good: Destination::from_arg(&self.outgood, Destination::Stdout),
            bad: Destination::from_arg(&self.outerr, Destination::Stderr),
            router: RouterOptions {
                good_rate: self.randomout,
                bad_rate: self.randomout,
                silent: self.silent,
                errmsg: self.errmsg,
                seed: self.seed,
            },
        }
    }
}

fn parse_field_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("field count must be greater than zero".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("expected a positive integer, got {:?}", s)),
    }
}

fn parse_sample_rate(s: &str) -> Result<SampleRate, String> {
    let percent: i32 = s
        .parse()
        .map_err(|_| format!("expected -1 or a percentage, got {:?}", s))?;
    SampleRate::from_percent(percent)
}
