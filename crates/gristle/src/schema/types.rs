//! Core type definitions for schema representation.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Logical type of a field whose raw value is always text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DgType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Text values, never cast.
    String,
}

impl DgType {
    /// Returns true if values of this type are cast before checking.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DgType::Integer | DgType::Float)
    }

    /// Name as written in a schema document.
    pub fn as_str(&self) -> &'static str {
        match self {
            DgType::Integer => "integer",
            DgType::Float => "float",
            DgType::String => "string",
        }
    }

    /// Parse text as this type.
    ///
    /// Surrounding whitespace is ignored. Returns `None` when the text is not
    /// a valid value, and always for [`DgType::String`]. Integers are held
    /// as `i128`; wider values fail to parse.
    pub fn parse_number(&self, text: &str) -> Option<NumericValue> {
        let trimmed = text.trim();
        match self {
            DgType::Integer => trimmed.parse::<i128>().ok().map(NumericValue::Integer),
            DgType::Float => trimmed.parse::<f64>().ok().map(NumericValue::Float),
            DgType::String => None,
        }
    }
}

impl FromStr for DgType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(DgType::Integer),
            "float" => Ok(DgType::Float),
            "string" => Ok(DgType::String),
            _ => Err(format!("unknown dg_type: {}", s)),
        }
    }
}

impl fmt::Display for DgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field value or bound after casting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumericValue {
    Integer(i128),
    Float(f64),
}

impl NumericValue {
    /// Compare two values. Integers compare exactly; anything involving a
    /// float compares as `f64` and is unordered for NaN.
    pub fn compare(&self, other: &NumericValue) -> Option<Ordering> {
        match (self, other) {
            (NumericValue::Integer(a), NumericValue::Integer(b)) => Some(a.cmp(b)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            NumericValue::Integer(i) => *i as f64,
            NumericValue::Float(f) => *f,
        }
    }
}

impl fmt::Display for NumericValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NumericValue::Integer(i) => write!(f, "{}", i),
            NumericValue::Float(x) => write!(f, "{}", x),
        }
    }
}

/// JSON-schema `type` names accepted in a constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
    Array,
    Object,
    Any,
}

impl JsonType {
    /// Whether a raw csv value, which is always a string, satisfies this type.
    pub fn accepts_text(&self) -> bool {
        matches!(self, JsonType::String | JsonType::Any)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JsonType::String => "string",
            JsonType::Number => "number",
            JsonType::Integer => "integer",
            JsonType::Boolean => "boolean",
            JsonType::Null => "null",
            JsonType::Array => "array",
            JsonType::Object => "object",
            JsonType::Any => "any",
        }
    }
}

impl FromStr for JsonType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(JsonType::String),
            "number" => Ok(JsonType::Number),
            "integer" => Ok(JsonType::Integer),
            "boolean" => Ok(JsonType::Boolean),
            "null" => Ok(JsonType::Null),
            "array" => Ok(JsonType::Array),
            "object" => Ok(JsonType::Object),
            "any" => Ok(JsonType::Any),
            _ => Err(format!("unknown type: {}", s)),
        }
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
