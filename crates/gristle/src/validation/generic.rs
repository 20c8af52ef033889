//! Generic string rules: `required`, `blank`, `type`, `enum`, `pattern`,
//! `minLength` and `maxLength`.

use crate::schema::{FieldConstraint, Rule};

use super::verdict::FailureKind;

/// Check one field's raw value against a constraint's generic rules.
///
/// `value` is `None` when the record has no field at this position.
pub fn check_field(constraint: &FieldConstraint, value: Option<&str>) -> Result<(), FailureKind> {
    let Some(value) = value else {
        return if constraint.required {
            Err(FailureKind::Required)
        } else {
            Ok(())
        };
    };

    if value.is_empty() {
        return if constraint.blank {
            Ok(())
        } else {
            Err(FailureKind::Blank)
        };
    }

    for rule in &constraint.rules {
        check_rule(rule, value)?;
    }
    Ok(())
}

fn check_rule(rule: &Rule, value: &str) -> Result<(), FailureKind> {
    match rule {
        Rule::Type(types) => {
            if !types.iter().any(|t| t.accepts_text()) {
                return Err(FailureKind::WrongType {
                    value: value.to_string(),
                    expected: types.clone(),
                });
            }
        }
        Rule::Enum(allowed) => {
            if !allowed.contains(value) {
                return Err(FailureKind::NotInEnum {
                    value: value.to_string(),
                    allowed: allowed.iter().cloned().collect(),
                });
            }
        }
        Rule::Pattern(pattern) => {
            if !pattern.is_match(value) {
                return Err(FailureKind::PatternMismatch {
                    value: value.to_string(),
                    pattern: pattern.source().to_string(),
                });
            }
        }
        Rule::MinLength(min) => {
            if value.chars().count() < *min {
                return Err(FailureKind::TooShort {
                    value: value.to_string(),
                    min: *min,
                });
            }
        }
        Rule::MaxLength(max) => {
            if value.chars().count() > *max {
                return Err(FailureKind::TooLong {
                    value: value.to_string(),
                    max: *max,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{JsonType, Pattern};
    use indexmap::IndexSet;

    fn enum_rule(values: &[&str]) -> Rule {
        Rule::Enum(values.iter().map(|v| v.to_string()).collect::<IndexSet<_>>())
    }

    #[test]
    fn test_missing_field() {
        let optional = FieldConstraint::new();
        assert!(check_field(&optional, None).is_ok());

        let required = FieldConstraint::new().with_required(true);
        assert_eq!(check_field(&required, None), Err(FailureKind::Required));
    }

    #[test]
    fn test_blank_defaults_to_disallowed() {
        let constraint = FieldConstraint::new();
        assert_eq!(check_field(&constraint, Some("")), Err(FailureKind::Blank));

        let constraint = FieldConstraint::new()
            .with_blank(true)
            .with_rule(Rule::MinLength(3));
        assert!(check_field(&constraint, Some("")).is_ok());
    }

    #[test]
    fn test_type_rule() {
        let constraint = FieldConstraint::new().with_rule(Rule::Type(vec![JsonType::String]));
        assert!(check_field(&constraint, Some("abc")).is_ok());

        let constraint = FieldConstraint::new().with_rule(Rule::Type(vec![JsonType::Integer]));
        assert!(matches!(
            check_field(&constraint, Some("12")),
            Err(FailureKind::WrongType { .. })
        ));
    }

    #[test]
    fn test_enum_rule() {
        let constraint = FieldConstraint::new().with_rule(enum_rule(&["red", "blue"]));
        assert!(check_field(&constraint, Some("red")).is_ok());
        assert_eq!(
            check_field(&constraint, Some("pink")),
            Err(FailureKind::NotInEnum {
                value: "pink".to_string(),
                allowed: vec!["red".to_string(), "blue".to_string()],
            })
        );
    }

    #[test]
    fn test_pattern_rule() {
        let constraint = FieldConstraint::new()
            .with_rule(Rule::Pattern(Pattern::new("[0-9]{5}$").unwrap()));
        assert!(check_field(&constraint, Some("12345")).is_ok());
        assert!(matches!(
            check_field(&constraint, Some("1234a")),
            Err(FailureKind::PatternMismatch { .. })
        ));
    }

    #[test]
    fn test_length_rules_count_chars() {
        let constraint = FieldConstraint::new()
            .with_rule(Rule::MinLength(2))
            .with_rule(Rule::MaxLength(3));
        assert!(check_field(&constraint, Some("héé")).is_ok());
        assert!(matches!(
            check_field(&constraint, Some("a")),
            Err(FailureKind::TooShort { min: 2, .. })
        ));
        assert!(matches!(
            check_field(&constraint, Some("abcd")),
            Err(FailureKind::TooLong { max: 3, .. })
        ));
    }

    #[test]
    fn test_first_rule_wins() {
        let constraint = FieldConstraint::new()
            .with_rule(enum_rule(&["a"]))
            .with_rule(Rule::MaxLength(0));
        assert!(matches!(
            check_field(&constraint, Some("b")),
            Err(FailureKind::NotInEnum { .. })
        ));
    }
}
