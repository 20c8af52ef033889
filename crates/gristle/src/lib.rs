//! Gristle: streaming validation of delimited records.
//!
//! Records are read from one or more CSV files (or standard input), checked
//! against an expected field count and an optional field schema, and routed
//! to a "good" or "bad" output in the input's own dialect.
//!
//! # Example
//!
//! ```no_run
//! use gristle::{Destination, InputSource, RunConfig};
//!
//! let config = RunConfig {
//!     inputs: vec![InputSource::from_arg("people.csv")],
//!     schema_path: Some("people.yml".into()),
//!     good: Destination::File("good.csv".into()),
//!     bad: Destination::File("bad.csv".into()),
//!     ..Default::default()
//! };
//!
//! let stats = gristle::run(&config).unwrap();
//! println!("{} of {} records valid", stats.valid, stats.total);
//! std::process::exit(stats.exit_status().code());
//! ```

pub mod dialect;
pub mod error;
pub mod input;
pub mod output;
pub mod schema;
pub mod stats;
pub mod validation;

mod run;

pub use crate::run::{RunConfig, ValidationRun, resolve_dialect, run};
pub use dialect::{Dialect, DialectOverrides, Quoting, Sniffer, Terminator};
pub use error::{GristleError, Result, SchemaError};
pub use input::{InputSource, InputStream, Record};
pub use output::{Destination, OutputRouter, RouterOptions, SampleRate};
pub use schema::{DgType, FieldConstraint, SchemaDocument};
pub use stats::{ExitStatus, RunStats};
pub use validation::{RecordValidator, Verdict};
