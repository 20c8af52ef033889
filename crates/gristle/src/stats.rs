//! Run counters and the terminal exit status derived from them.

use serde::Serialize;

use crate::validation::Verdict;

/// Terminal status of a validation run.
///
/// The numeric codes mirror the Linux errno values `ENODATA` (61) and
/// `EBADMSG` (74) so shell scripts can branch on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitStatus {
    /// At least one record read, none invalid.
    Success,
    /// Configuration or structural failure outside the record loop.
    Error,
    /// Zero records read.
    NoData,
    /// At least one invalid record.
    InvalidData,
}

impl ExitStatus {
    /// Process exit code for this status.
    pub fn code(&self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Error => 1,
            ExitStatus::NoData => 61,
            ExitStatus::InvalidData => 74,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ExitStatus::Success => "success",
            ExitStatus::Error => "error",
            ExitStatus::NoData => "no data",
            ExitStatus::InvalidData => "invalid data found",
        }
    }
}

/// Record counts for a run. Updated exactly once per record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Every record read, headers included.
    #[serde(rename = "input_cnt")]
    pub total: u64,
    #[serde(rename = "valid_cnt")]
    pub valid: u64,
    #[serde(rename = "invalid_cnt")]
    pub invalid: u64,
}

impl RunStats {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one record according to its verdict.
    pub fn record(&mut self, verdict: &Verdict) {
        self.total += 1;
        if verdict.is_valid() {
            self.valid += 1;
        } else {
            self.invalid += 1;
        }
    }

    /// Derive the terminal status. Invalid data outranks no data.
    pub fn exit_status(&self) -> ExitStatus {
        if self.invalid > 0 {
            ExitStatus::InvalidData
        } else if self.total == 0 {
            ExitStatus::NoData
        } else {
            ExitStatus::Success
        }
    }
}
