//! Output destinations.

use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::error::{GristleError, Result};

/// Where one output stream goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    Stderr,
    /// A file, truncated when opened.
    File(PathBuf),
}

impl Destination {
    /// Parse a command-line argument; `-` selects `default`.
    pub fn from_arg(arg: &str, default: Destination) -> Self {
        if arg == "-" {
            default
        } else {
            Destination::File(PathBuf::from(arg))
        }
    }

    /// Open the destination for writing.
    pub fn open(&self) -> Result<Box<dyn Write>> {
        match self {
            Destination::Stdout => Ok(Box::new(BufWriter::new(io::stdout()))),
            Destination::Stderr => Ok(Box::new(io::stderr())),
            Destination::File(path) => {
                let file = File::create(path).map_err(|source| GristleError::Output {
                    destination: path.display().to_string(),
                    source,
                })?;
                Ok(Box::new(BufWriter::new(file)))
            }
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Stdout => write!(f, "<stdout>"),
            Destination::Stderr => write!(f, "<stderr>"),
            Destination::File(path) => write!(f, "{}", path.display()),
        }
    }
}
