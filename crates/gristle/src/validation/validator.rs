//! The per-record check sequence.

use tracing::trace;

use super::caster::{CastError, cast, cast_in_range};
use super::generic::check_field;
use super::verdict::{FailureKind, FieldFailure, Verdict};
use crate::input::Record;
use crate::schema::SchemaDocument;

/// Validates records one at a time.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. field count against the baseline (headers included)
/// 2. `dg_type` casts for every numeric column
/// 3. `dg_minimum` / `dg_maximum` bounds
/// 4. generic rules on the raw strings
///
/// Steps 2-4 are skipped for header records and for records whose field
/// count is wrong.
#[derive(Debug, Clone)]
pub struct RecordValidator {
    schema: Option<SchemaDocument>,
    has_header: bool,
    baseline: Option<usize>,
    last_message: Option<String>,
}

impl RecordValidator {
    /// Create a validator. Without a schema only field counts are checked.
    pub fn new(schema: Option<SchemaDocument>, has_header: bool) -> Self {
        Self {
            schema,
            has_header,
            baseline: None,
            last_message: None,
        }
    }

    /// Fix the expected field count instead of taking it from the first record.
    pub fn with_field_count(mut self, field_count: usize) -> Self {
        self.baseline = Some(field_count);
        self
    }

    /// The expected field count, once established.
    pub fn baseline(&self) -> Option<usize> {
        self.baseline
    }

    /// Message of the most recent invalid verdict.
    pub fn last_message(&self) -> Option<&str> {
        self.last_message.as_deref()
    }

    /// Validate one record.
    pub fn validate(&mut self, record: &Record) -> Verdict {
        let verdict = self.check(record);
        if let Some(message) = verdict.message() {
            trace!(record = record.number(), %message, "invalid record");
            self.last_message = Some(message.to_string());
        }
        verdict
    }

    fn check(&mut self, record: &Record) -> Verdict {
        let baseline = *self.baseline.get_or_insert(record.len());
        if record.len() != baseline {
            return Verdict::invalid(format!(
                "bad field count - expected {}, got {}",
                baseline,
                record.len()
            ));
        }

        if self.has_header && record.is_first_in_file() {
            return Verdict::Valid;
        }

        let Some(schema) = &self.schema else {
            return Verdict::Valid;
        };

        match check_schema(schema, record) {
            Ok(()) => Verdict::Valid,
            Err(failure) => Verdict::invalid(failure.to_string()),
        }
    }
}

/// Run the schema stages in order, returning the first failure.
fn check_schema(schema: &SchemaDocument, record: &Record) -> Result<(), FieldFailure> {
    // dg_type casts
    for (index, constraint) in schema.items().iter().enumerate() {
        let Some(dg_type) = constraint.numeric_type() else {
            continue;
        };
        let title = constraint.title.as_deref();
        let Some(value) = record.get(index) else {
            return Err(FieldFailure::new(
                index,
                title,
                FailureKind::FieldMissing { dg_type },
            ));
        };
        if cast(dg_type, value).is_err() {
            return Err(FieldFailure::new(
                index,
                title,
                FailureKind::NotCastable {
                    dg_type,
                    value: value.to_string(),
                },
            ));
        }
    }

    // dg_minimum / dg_maximum
    for (index, constraint) in schema.items().iter().enumerate() {
        if !constraint.has_range() {
            continue;
        }
        let Some(value) = record.get(index) else {
            continue;
        };
        let kind = match cast_in_range(constraint, value) {
            Ok(_) => continue,
            Err(CastError::BelowMinimum { value, bound }) => {
                FailureKind::BelowMinimum { value, bound }
            }
            Err(CastError::AboveMaximum { value, bound }) => {
                FailureKind::AboveMaximum { value, bound }
            }
            // Already reported by the cast stage
            Err(CastError::Type) => continue,
        };
        return Err(FieldFailure::new(index, constraint.title.as_deref(), kind));
    }

    // Generic rules
    for (index, constraint) in schema.items().iter().enumerate() {
        check_field(constraint, record.get(index))
            .map_err(|kind| FieldFailure::new(index, constraint.title.as_deref(), kind))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{DgType, FieldConstraint, NumericValue, Rule};

    fn record(number: u64, fields: &[&str]) -> Record {
        Record::new(
            fields.iter().map(|f| f.to_string()).collect(),
            number,
            number,
        )
    }

    fn schema(items: Vec<FieldConstraint>) -> Option<SchemaDocument> {
        Some(SchemaDocument::new(items))
    }

    #[test]
    fn test_baseline_from_first_record() {
        let mut validator = RecordValidator::new(None, false);
        assert!(validator.validate(&record(1, &["a", "b", "c"])).is_valid());
        assert_eq!(validator.baseline(), Some(3));
        assert!(validator.validate(&record(2, &["1", "2", "3"])).is_valid());

        let verdict = validator.validate(&record(3, &["4", "5"]));
        assert_eq!(verdict.message(), Some("bad field count - expected 3, got 2"));
        assert_eq!(
            validator.last_message(),
            Some("bad field count - expected 3, got 2")
        );
    }

    #[test]
    fn test_explicit_field_count_applies_to_first_record() {
        let mut validator = RecordValidator::new(None, false).with_field_count(2);
        let verdict = validator.validate(&record(1, &["a", "b", "c"]));
        assert_eq!(verdict.message(), Some("bad field count - expected 2, got 3"));
        assert!(validator.validate(&record(2, &["a", "b"])).is_valid());
    }

    #[test]
    fn test_header_skips_schema_but_not_field_count() {
        let items = vec![FieldConstraint::new().with_dg_type(DgType::Integer)];
        let mut validator = RecordValidator::new(schema(items.clone()), true);
        assert!(validator.validate(&record(1, &["count"])).is_valid());
        assert!(validator.validate(&record(2, &["5"])).is_valid());
        assert!(!validator.validate(&record(3, &["five"])).is_valid());

        let mut validator = RecordValidator::new(schema(items), true).with_field_count(2);
        assert!(!validator.validate(&record(1, &["count"])).is_valid());
    }

    #[test]
    fn test_field_count_failure_skips_schema() {
        let items = vec![FieldConstraint::new().with_dg_type(DgType::Integer)];
        let mut validator = RecordValidator::new(schema(items), false).with_field_count(1);
        let verdict = validator.validate(&record(1, &["x", "y"]));
        assert_eq!(verdict.message(), Some("bad field count - expected 1, got 2"));
    }

    #[test]
    fn test_dg_type_message_names_field() {
        let items = vec![
            FieldConstraint::new(),
            FieldConstraint::new()
                .with_title("age")
                .with_dg_type(DgType::Integer),
        ];
        let mut validator = RecordValidator::new(schema(items), false);
        let verdict = validator.validate(&record(1, &["bob", "old"]));
        assert_eq!(
            verdict.message(),
            Some("Failed dg_type:integer check on field 1 (age), value: 'old'")
        );
    }

    #[test]
    fn test_constraint_beyond_record_is_wrong_delimiter() {
        let items = vec![
            FieldConstraint::new(),
            FieldConstraint::new().with_dg_type(DgType::Float),
        ];
        let mut validator = RecordValidator::new(schema(items), false);
        let verdict = validator.validate(&record(1, &["1;2"]));
        assert_eq!(
            verdict.message(),
            Some("Failed dg_type:float check on field 1: parsing error, wrong delimiter?")
        );
    }

    #[test]
    fn test_minimum_boundary_inclusive() {
        let items = vec![FieldConstraint::new()
            .with_dg_type(DgType::Integer)
            .with_range(Some(NumericValue::Integer(0)), None)];
        let mut validator = RecordValidator::new(schema(items), false);
        assert!(validator.validate(&record(1, &["5"])).is_valid());
        assert!(validator.validate(&record(2, &["0"])).is_valid());

        let verdict = validator.validate(&record(3, &["-1"]));
        assert_eq!(
            verdict.message(),
            Some("Failed dg_minimum check on field 0, value: -1 is less than 0")
        );
    }

    #[test]
    fn test_maximum_boundary_inclusive() {
        let items = vec![FieldConstraint::new()
            .with_dg_type(DgType::Integer)
            .with_range(None, Some(NumericValue::Integer(10)))];
        let mut validator = RecordValidator::new(schema(items), false);
        assert!(validator.validate(&record(1, &["-3"])).is_valid());
        assert!(validator.validate(&record(2, &["10"])).is_valid());

        let verdict = validator.validate(&record(3, &["11"]));
        assert_eq!(
            verdict.message(),
            Some("Failed dg_maximum check on field 0, value: 11 is greater than 10")
        );
    }

    #[test]
    fn test_integer_beyond_i64_is_range_checked() {
        let items = vec![FieldConstraint::new()
            .with_dg_type(DgType::Integer)
            .with_range(Some(NumericValue::Integer(0)), None)];
        let mut validator = RecordValidator::new(schema(items), false);
        assert!(validator.validate(&record(1, &["99999999999999999999"])).is_valid());

        let verdict = validator.validate(&record(2, &["-99999999999999999999"]));
        assert_eq!(
            verdict.message(),
            Some("Failed dg_minimum check on field 0, value: -99999999999999999999 is less than 0")
        );
    }

    #[test]
    fn test_cast_stage_runs_before_range_stage() {
        let items = vec![
            FieldConstraint::new()
                .with_dg_type(DgType::Integer)
                .with_range(None, Some(NumericValue::Integer(10))),
            FieldConstraint::new().with_dg_type(DgType::Integer),
        ];
        let mut validator = RecordValidator::new(schema(items), false);
        let verdict = validator.validate(&record(1, &["99", "x"]));
        assert!(verdict.message().unwrap().starts_with("Failed dg_type:integer check on field 1"));
    }

    #[test]
    fn test_generic_rules_run_last() {
        let items = vec![FieldConstraint::new()
            .with_title("code")
            .with_rule(Rule::MaxLength(2))];
        let mut validator = RecordValidator::new(schema(items), false);
        assert!(validator.validate(&record(1, &["ab"])).is_valid());
        let verdict = validator.validate(&record(2, &["abc"]));
        assert_eq!(
            verdict.message(),
            Some("Failed maxLength check on field 0 (code), value: 'abc' is longer than 2")
        );
    }

    #[test]
    fn test_valid_record_keeps_last_message() {
        let mut validator = RecordValidator::new(None, false);
        validator.validate(&record(1, &["a"]));
        validator.validate(&record(2, &["a", "b"]));
        validator.validate(&record(3, &["c"]));
        assert_eq!(
            validator.last_message(),
            Some("bad field count - expected 1, got 2")
        );
    }
}
