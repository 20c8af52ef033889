//! Per-record outcome and the failures that explain it.

use std::fmt;

use crate::schema::{DgType, JsonType, NumericValue};

/// Outcome of validating one record. An invalid record carries exactly one
/// message: the first check that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Valid,
    Invalid { message: String },
}

impl Verdict {
    /// Create an invalid verdict.
    pub fn invalid(message: impl Into<String>) -> Self {
        Verdict::Invalid {
            message: message.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }

    /// The explanatory message, if invalid.
    pub fn message(&self) -> Option<&str> {
        match self {
            Verdict::Valid => None,
            Verdict::Invalid { message } => Some(message),
        }
    }
}

/// Why a single field failed.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureKind {
    /// The constrained field lies beyond the end of the record.
    FieldMissing { dg_type: DgType },
    /// The value does not parse as its `dg_type`.
    NotCastable { dg_type: DgType, value: String },
    BelowMinimum {
        value: NumericValue,
        bound: NumericValue,
    },
    AboveMaximum {
        value: NumericValue,
        bound: NumericValue,
    },
    /// A `required` field is absent.
    Required,
    /// An empty value where `blank` is not allowed.
    Blank,
    WrongType {
        value: String,
        expected: Vec<JsonType>,
    },
    NotInEnum {
        value: String,
        allowed: Vec<String>,
    },
    PatternMismatch { value: String, pattern: String },
    TooShort { value: String, min: usize },
    TooLong { value: String, max: usize },
}

impl FailureKind {
    /// Name of the failing check as it appears in messages.
    pub fn check_name(&self) -> String {
        match self {
            FailureKind::FieldMissing { dg_type } | FailureKind::NotCastable { dg_type, .. } => {
                format!("dg_type:{}", dg_type)
            }
            FailureKind::BelowMinimum { .. } => "dg_minimum".to_string(),
            FailureKind::AboveMaximum { .. } => "dg_maximum".to_string(),
            FailureKind::Required => "required".to_string(),
            FailureKind::Blank => "blank".to_string(),
            FailureKind::WrongType { .. } => "type".to_string(),
            FailureKind::NotInEnum { .. } => "enum".to_string(),
            FailureKind::PatternMismatch { .. } => "pattern".to_string(),
            FailureKind::TooShort { .. } => "minLength".to_string(),
            FailureKind::TooLong { .. } => "maxLength".to_string(),
        }
    }
}

/// A failed check on one field, with enough context for a message.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    /// Zero-based field position.
    pub index: usize,
    pub title: Option<String>,
    pub kind: FailureKind,
}

impl FieldFailure {
    pub fn new(index: usize, title: Option<&str>, kind: FailureKind) -> Self {
        Self {
            index,
            title: title.map(str::to_string),
            kind,
        }
    }
}

impl fmt::Display for FieldFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed {} check on field {}", self.kind.check_name(), self.index)?;
        if let Some(title) = &self.title {
            write!(f, " ({})", title)?;
        }

        match &self.kind {
            FailureKind::FieldMissing { .. } => write!(f, ": parsing error, wrong delimiter?"),
            FailureKind::NotCastable { value, .. } => write!(f, ", value: '{}'", value),
            FailureKind::BelowMinimum { value, bound } => {
                write!(f, ", value: {} is less than {}", value, bound)
            }
            FailureKind::AboveMaximum { value, bound } => {
                write!(f, ", value: {} is greater than {}", value, bound)
            }
            FailureKind::Required => write!(f, ": field is missing"),
            FailureKind::Blank => write!(f, ": value is blank"),
            FailureKind::WrongType { value, expected } => {
                let names: Vec<&str> = expected.iter().map(JsonType::as_str).collect();
                write!(f, ", value: '{}' is not of type {}", value, names.join(" or "))
            }
            FailureKind::NotInEnum { value, allowed } => {
                write!(f, ", value: '{}' is not one of [{}]", value, allowed.join(", "))
            }
            FailureKind::PatternMismatch { value, pattern } => {
                write!(f, ", value: '{}' does not match '{}'", value, pattern)
            }
            FailureKind::TooShort { value, min } => {
                write!(f, ", value: '{}' is shorter than {}", value, min)
            }
            FailureKind::TooLong { value, max } => {
                write!(f, ", value: '{}' is longer than {}", value, max)
            }
        }
    }
}
