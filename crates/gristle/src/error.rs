//! Error types for the gristle library.
//!
//! Only setup-time problems are errors. A record that fails validation is
//! reported through a [`Verdict`](crate::validation::Verdict) instead and
//! never aborts a run.

use std::path::PathBuf;
use thiserror::Error;

use crate::stats::ExitStatus;

/// Main error type for gristle operations.
#[derive(Debug, Error)]
pub enum GristleError {
    /// Error reading or accessing an input or schema file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error opening or writing an output destination.
    #[error("cannot write output '{destination}': {source}")]
    Output {
        destination: String,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// The schema document is malformed.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Dialect settings that must be given explicitly were not.
    #[error("dialect must be provided for stdin or multiple files - missing: {}", .0.join(", "))]
    MissingDialect(Vec<&'static str>),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The input holds nothing to analyze.
    #[error("No data: {0}")]
    NoData(String),
}

impl GristleError {
    /// Wrap an IO error for the given path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GristleError::Io {
            path: path.into(),
            source,
        }
    }

    /// The process status this error terminates a run with.
    pub fn exit_status(&self) -> ExitStatus {
        match self {
            GristleError::NoData(_) => ExitStatus::NoData,
            _ => ExitStatus::Error,
        }
    }

    /// Short headline for console reporting.
    pub fn summary(&self) -> &'static str {
        match self {
            GristleError::Io { .. } => "Unable to read input",
            GristleError::Output { .. } => "Unable to open output",
            GristleError::Csv(_) => "Unable to parse input",
            GristleError::Schema(_) => "Invalid schema",
            GristleError::MissingDialect(_) => "Incomplete dialect",
            GristleError::Config(_) => "Invalid configuration",
            GristleError::NoData(_) => "No data",
        }
    }
}

/// Structural problems found while meta-validating a schema document.
///
/// `index` is the zero-based position of the offending entry in `items`.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema is not valid YAML: {0}")]
    Syntax(#[from] serde_yaml::Error),

    #[error("schema must be a mapping with a single 'items' key")]
    NotAMapping,

    #[error("schema has no 'items' key")]
    MissingItems,

    #[error("schema has unexpected top-level key '{0}' - only 'items' is allowed")]
    UnexpectedTopLevelKey(String),

    #[error("schema 'items' must be a sequence of field constraints")]
    ItemsNotSequence,

    #[error("items[{index}] must be a mapping")]
    ConstraintNotMapping { index: usize },

    #[error("items[{index}]: unknown option '{key}'")]
    UnknownKeyword { index: usize, key: String },

    #[error(
        "items[{index}]: '{key}' is not supported because csv fields are strings - \
         use dg_type, dg_minimum and dg_maximum instead"
    )]
    UnsupportedKeyword { index: usize, key: String },

    #[error("items[{index}]: '{key}' must be true or false")]
    InvalidBoolean { index: usize, key: &'static str },

    #[error("items[{index}]: dg_type '{value}' is not one of integer, float, string")]
    InvalidDgType { index: usize, value: String },

    #[error("items[{index}]: {key} requires a dg_type")]
    BoundWithoutDgType { index: usize, key: &'static str },

    #[error("items[{index}]: {key} requires a numeric dg_type, not string")]
    BoundOnStringType { index: usize, key: &'static str },

    #[error("items[{index}]: {key} value '{value}' is not a valid {dg_type}")]
    InvalidBound {
        index: usize,
        key: &'static str,
        value: String,
        dg_type: &'static str,
    },

    #[error("items[{index}]: '{key}' must be {expected}")]
    InvalidValue {
        index: usize,
        key: &'static str,
        expected: &'static str,
    },

    #[error("items[{index}]: pattern does not compile: {source}")]
    InvalidPattern {
        index: usize,
        #[source]
        source: regex::Error,
    },
}

/// Result type alias for gristle operations.
pub type Result<T> = std::result::Result<T, GristleError>;
