//! Numeric casting and range checks for `dg_type` fields.

use std::cmp::Ordering;

use crate::schema::{DgType, FieldConstraint, NumericValue};

/// Why a value could not be accepted as its logical numeric type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CastError {
    /// The text does not parse as the type.
    Type,
    /// The value parsed but lies below `dg_minimum`.
    BelowMinimum {
        value: NumericValue,
        bound: NumericValue,
    },
    /// The value parsed but lies above `dg_maximum`.
    AboveMaximum {
        value: NumericValue,
        bound: NumericValue,
    },
}

/// Cast text to a numeric type.
pub fn cast(dg_type: DgType, text: &str) -> Result<NumericValue, CastError> {
    dg_type.parse_number(text).ok_or(CastError::Type)
}

/// Cast text and compare it against the constraint's inclusive bounds.
///
/// Returns `Ok(None)` when the constraint has no numeric `dg_type`.
pub fn cast_in_range(
    constraint: &FieldConstraint,
    text: &str,
) -> Result<Option<NumericValue>, CastError> {
    let Some(dg_type) = constraint.numeric_type() else {
        return Ok(None);
    };
    let value = cast(dg_type, text)?;

    if let Some(bound) = constraint.dg_minimum {
        if value.compare(&bound) == Some(Ordering::Less) {
            return Err(CastError::BelowMinimum { value, bound });
        }
    }
    if let Some(bound) = constraint.dg_maximum {
        if value.compare(&bound) == Some(Ordering::Greater) {
            return Err(CastError::AboveMaximum { value, bound });
        }
    }

    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounded_integer(min: i128, max: i128) -> FieldConstraint {
        FieldConstraint::new()
            .with_dg_type(DgType::Integer)
            .with_range(
                Some(NumericValue::Integer(min)),
                Some(NumericValue::Integer(max)),
            )
    }

    #[test]
    fn test_cast() {
        assert_eq!(cast(DgType::Integer, "12"), Ok(NumericValue::Integer(12)));
        assert_eq!(cast(DgType::Integer, "1.2"), Err(CastError::Type));
        assert_eq!(cast(DgType::Float, "1.2"), Ok(NumericValue::Float(1.2)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let constraint = bounded_integer(0, 10);
        assert!(cast_in_range(&constraint, "0").is_ok());
        assert!(cast_in_range(&constraint, "10").is_ok());
        assert_eq!(
            cast_in_range(&constraint, "-1"),
            Err(CastError::BelowMinimum {
                value: NumericValue::Integer(-1),
                bound: NumericValue::Integer(0),
            })
        );
        assert!(matches!(
            cast_in_range(&constraint, "11"),
            Err(CastError::AboveMaximum { .. })
        ));
    }

    #[test]
    fn test_type_error_before_range() {
        let constraint = bounded_integer(0, 10);
        assert_eq!(cast_in_range(&constraint, "ten"), Err(CastError::Type));
    }

    #[test]
    fn test_non_numeric_constraint_not_cast() {
        let constraint = FieldConstraint::new().with_dg_type(DgType::String);
        assert_eq!(cast_in_range(&constraint, "anything"), Ok(None));
        assert_eq!(cast_in_range(&FieldConstraint::new(), "x"), Ok(None));
    }

    #[test]
    fn test_float_bounds() {
        let constraint = FieldConstraint::new()
            .with_dg_type(DgType::Float)
            .with_range(Some(NumericValue::Float(0.5)), None);
        assert!(cast_in_range(&constraint, "0.5").is_ok());
        assert!(matches!(
            cast_in_range(&constraint, "0.49"),
            Err(CastError::BelowMinimum { .. })
        ));
    }
}
