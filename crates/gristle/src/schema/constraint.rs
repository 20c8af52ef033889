//! Per-column constraint definition.

use indexmap::IndexSet;
use regex::Regex;

use super::types::{DgType, JsonType, NumericValue};

/// A compiled `pattern`. Keeps the source text for messages.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern that must match from the start of a value.
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!("^(?:{})", source))?;
        Ok(Self {
            source: source.to_string(),
            regex,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// A generic string rule, evaluated on the raw value.
#[derive(Debug, Clone)]
pub enum Rule {
    /// Value must satisfy one of the listed types.
    Type(Vec<JsonType>),
    /// Value must equal one of the listed values.
    Enum(IndexSet<String>),
    /// Value must match the pattern.
    Pattern(Pattern),
    /// Value must have at least this many characters.
    MinLength(usize),
    /// Value must have at most this many characters.
    MaxLength(usize),
}

impl Rule {
    /// Schema keyword this rule was read from.
    pub fn keyword(&self) -> &'static str {
        match self {
            Rule::Type(_) => "type",
            Rule::Enum(_) => "enum",
            Rule::Pattern(_) => "pattern",
            Rule::MinLength(_) => "minLength",
            Rule::MaxLength(_) => "maxLength",
        }
    }
}

/// Constraint applied to the field at the same position in every record.
#[derive(Debug, Clone, Default)]
pub struct FieldConstraint {
    /// Human-readable field name used in messages.
    pub title: Option<String>,
    /// Missing field is an error when true.
    pub required: bool,
    /// Empty value is allowed when true.
    pub blank: bool,
    /// Logical numeric type the value is cast to.
    pub dg_type: Option<DgType>,
    /// Inclusive lower bound, same type as `dg_type`.
    pub dg_minimum: Option<NumericValue>,
    /// Inclusive upper bound, same type as `dg_type`.
    pub dg_maximum: Option<NumericValue>,
    /// Generic rules in evaluation order.
    pub rules: Vec<Rule>,
}

impl FieldConstraint {
    /// Create an unconstrained field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the logical type.
    pub fn with_dg_type(mut self, dg_type: DgType) -> Self {
        self.dg_type = Some(dg_type);
        self
    }

    /// Set the inclusive bounds.
    pub fn with_range(mut self, min: Option<NumericValue>, max: Option<NumericValue>) -> Self {
        self.dg_minimum = min;
        self.dg_maximum = max;
        self
    }

    /// Allow empty values.
    pub fn with_blank(mut self, blank: bool) -> Self {
        self.blank = blank;
        self
    }

    /// Require the field to be present.
    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Append a generic rule.
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// The numeric type to cast to, if any.
    pub fn numeric_type(&self) -> Option<DgType> {
        self.dg_type.filter(DgType::is_numeric)
    }

    pub fn has_range(&self) -> bool {
        self.dg_minimum.is_some() || self.dg_maximum.is_some()
    }
}
