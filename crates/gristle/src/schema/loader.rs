//! Schema parsing and meta-validation.
//!
//! A document is either accepted whole or rejected with the first structural
//! problem found; no partially-checked schema ever reaches the validator.

use indexmap::{IndexMap, IndexSet};
use serde_yaml::Value;

use super::constraint::{FieldConstraint, Pattern, Rule};
use super::types::{DgType, JsonType, NumericValue};
use crate::error::SchemaError;

/// Keywords a field constraint may carry.
pub const RECOGNIZED_KEYWORDS: &[&str] = &[
    "type",
    "title",
    "minLength",
    "maxLength",
    "enum",
    "pattern",
    "required",
    "blank",
    "dg_type",
    "dg_minimum",
    "dg_maximum",
];

/// JSON-schema keywords that assume numeric storage and are rejected.
pub const UNSUPPORTED_KEYWORDS: &[&str] = &["minimum", "maximum", "format", "divisibleBy"];

const TOP_LEVEL_KEY: &str = "items";

pub(super) fn parse_schema(text: &str) -> Result<Vec<FieldConstraint>, SchemaError> {
    let document: Value = serde_yaml::from_str(text)?;
    let Value::Mapping(map) = document else {
        return Err(SchemaError::NotAMapping);
    };

    for key in map.keys() {
        let name = key_name(key);
        if name != TOP_LEVEL_KEY {
            return Err(SchemaError::UnexpectedTopLevelKey(name));
        }
    }

    let items = map.get(TOP_LEVEL_KEY).ok_or(SchemaError::MissingItems)?;
    let Value::Sequence(items) = items else {
        return Err(SchemaError::ItemsNotSequence);
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_constraint(index, item))
        .collect()
}

fn parse_constraint(index: usize, value: &Value) -> Result<FieldConstraint, SchemaError> {
    let map = match value {
        Value::Mapping(map) => map,
        // An empty entry places no constraint on its field
        Value::Null => return Ok(FieldConstraint::new()),
        _ => return Err(SchemaError::ConstraintNotMapping { index }),
    };

    let mut fields: IndexMap<String, &Value> = IndexMap::with_capacity(map.len());
    for (key, value) in map {
        let name = key_name(key);
        if UNSUPPORTED_KEYWORDS.contains(&name.as_str()) {
            return Err(SchemaError::UnsupportedKeyword { index, key: name });
        }
        if !RECOGNIZED_KEYWORDS.contains(&name.as_str()) {
            return Err(SchemaError::UnknownKeyword { index, key: name });
        }
        fields.insert(name, value);
    }

    let mut constraint = FieldConstraint::new();

    if let Some(value) = fields.get("required") {
        constraint.required = parse_bool(index, "required", value)?;
    }
    if let Some(value) = fields.get("blank") {
        constraint.blank = parse_bool(index, "blank", value)?;
    }
    if let Some(value) = fields.get("title") {
        constraint.title = Some(
            value
                .as_str()
                .ok_or(SchemaError::InvalidValue {
                    index,
                    key: "title",
                    expected: "a string",
                })?
                .to_string(),
        );
    }

    if let Some(value) = fields.get("dg_type") {
        let dg_type = value
            .as_str()
            .and_then(|s| s.parse::<DgType>().ok())
            .ok_or_else(|| SchemaError::InvalidDgType {
                index,
                value: scalar_text(value).unwrap_or_else(|| format!("{:?}", value)),
            })?;
        constraint.dg_type = Some(dg_type);
    }
    constraint.dg_minimum = parse_bound(index, "dg_minimum", &fields, constraint.dg_type)?;
    constraint.dg_maximum = parse_bound(index, "dg_maximum", &fields, constraint.dg_type)?;

    if let Some(value) = fields.get("type") {
        constraint.rules.push(Rule::Type(parse_types(index, value)?));
    }
    if let Some(value) = fields.get("enum") {
        constraint.rules.push(Rule::Enum(parse_enum(index, value)?));
    }
    if let Some(value) = fields.get("pattern") {
        let source = value.as_str().ok_or(SchemaError::InvalidValue {
            index,
            key: "pattern",
            expected: "a string",
        })?;
        let pattern =
            Pattern::new(source).map_err(|source| SchemaError::InvalidPattern { index, source })?;
        constraint.rules.push(Rule::Pattern(pattern));
    }
    if let Some(value) = fields.get("minLength") {
        constraint
            .rules
            .push(Rule::MinLength(parse_length(index, "minLength", value)?));
    }
    if let Some(value) = fields.get("maxLength") {
        constraint
            .rules
            .push(Rule::MaxLength(parse_length(index, "maxLength", value)?));
    }

    Ok(constraint)
}

fn parse_bool(index: usize, key: &'static str, value: &Value) -> Result<bool, SchemaError> {
    value
        .as_bool()
        .ok_or(SchemaError::InvalidBoolean { index, key })
}

/// Bounds need a numeric sibling `dg_type` and must parse as that type.
fn parse_bound(
    index: usize,
    key: &'static str,
    fields: &IndexMap<String, &Value>,
    dg_type: Option<DgType>,
) -> Result<Option<NumericValue>, SchemaError> {
    let Some(value) = fields.get(key) else {
        return Ok(None);
    };
    let dg_type = match dg_type {
        None => return Err(SchemaError::BoundWithoutDgType { index, key }),
        Some(DgType::String) => return Err(SchemaError::BoundOnStringType { index, key }),
        Some(t) => t,
    };

    let text = scalar_text(value).unwrap_or_else(|| format!("{:?}", value));
    dg_type
        .parse_number(&text)
        .map(Some)
        .ok_or(SchemaError::InvalidBound {
            index,
            key,
            value: text,
            dg_type: dg_type.as_str(),
        })
}

fn parse_types(index: usize, value: &Value) -> Result<Vec<JsonType>, SchemaError> {
    let invalid = || SchemaError::InvalidValue {
        index,
        key: "type",
        expected: "a type name or list of type names",
    };
    let names: Vec<&str> = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Sequence(seq) => seq
            .iter()
            .map(|v| v.as_str().ok_or_else(invalid))
            .collect::<Result<_, _>>()?,
        _ => return Err(invalid()),
    };
    if names.is_empty() {
        return Err(invalid());
    }
    names
        .into_iter()
        .map(|name| name.parse::<JsonType>().map_err(|_| invalid()))
        .collect()
}

fn parse_enum(index: usize, value: &Value) -> Result<IndexSet<String>, SchemaError> {
    let invalid = || SchemaError::InvalidValue {
        index,
        key: "enum",
        expected: "a non-empty list of values",
    };
    let Value::Sequence(seq) = value else {
        return Err(invalid());
    };
    let values: IndexSet<String> = seq
        .iter()
        .map(|v| scalar_text(v).ok_or_else(invalid))
        .collect::<Result<_, _>>()?;
    if values.is_empty() {
        return Err(invalid());
    }
    Ok(values)
}

fn parse_length(index: usize, key: &'static str, value: &Value) -> Result<usize, SchemaError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or(SchemaError::InvalidValue {
            index,
            key,
            expected: "a non-negative integer",
        })
}

/// Text of a scalar value, as a csv field holding it would read.
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

fn key_name(key: &Value) -> String {
    scalar_text(key).unwrap_or_else(|| format!("{:?}", key))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Vec<FieldConstraint>, SchemaError> {
        parse_schema(text)
    }

    #[test]
    fn test_parse_full_constraint() {
        let items = parse(
            r#"
items:
  - title: age
    dg_type: integer
    dg_minimum: 0
    dg_maximum: "120"
    required: true
  - title: color
    enum: [red, blue]
    blank: true
  - pattern: "[A-Z]{2}"
    minLength: 2
    maxLength: 4
    type: string
"#,
        )
        .unwrap();

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].title.as_deref(), Some("age"));
        assert_eq!(items[0].dg_type, Some(DgType::Integer));
        assert_eq!(items[0].dg_minimum, Some(NumericValue::Integer(0)));
        assert_eq!(items[0].dg_maximum, Some(NumericValue::Integer(120)));
        assert!(items[0].required);
        assert!(items[1].blank);
        assert!(matches!(&items[1].rules[0], Rule::Enum(values) if values.len() == 2));

        let keywords: Vec<&str> = items[2].rules.iter().map(Rule::keyword).collect();
        assert_eq!(keywords, vec!["type", "pattern", "minLength", "maxLength"]);
    }

    #[test]
    fn test_json_document_accepted() {
        let items = parse(r#"{"items": [{"dg_type": "float", "dg_maximum": 1.5}]}"#).unwrap();
        assert_eq!(items[0].dg_maximum, Some(NumericValue::Float(1.5)));
    }

    #[test]
    fn test_extra_top_level_key_rejected() {
        let err = parse("items: []\nextra: 1\n").unwrap_err();
        assert!(matches!(err, SchemaError::UnexpectedTopLevelKey(k) if k == "extra"));
    }

    #[test]
    fn test_missing_items_rejected() {
        assert!(matches!(parse("{}").unwrap_err(), SchemaError::MissingItems));
        assert!(matches!(
            parse("fields: []").unwrap_err(),
            SchemaError::UnexpectedTopLevelKey(_)
        ));
        assert!(matches!(parse("- a\n").unwrap_err(), SchemaError::NotAMapping));
        assert!(matches!(
            parse("items: 3").unwrap_err(),
            SchemaError::ItemsNotSequence
        ));
    }

    #[test]
    fn test_unsupported_keyword_rejected() {
        for key in UNSUPPORTED_KEYWORDS {
            let err = parse(&format!("items:\n  - {}: 1\n", key)).unwrap_err();
            assert!(
                matches!(&err, SchemaError::UnsupportedKeyword { index: 0, key: k } if k == key),
                "unexpected error for {}: {:?}",
                key,
                err
            );
        }
    }

    #[test]
    fn test_unknown_keyword_rejected() {
        let err = parse("items:\n  - {}\n  - colour: red\n").unwrap_err();
        assert!(matches!(err, SchemaError::UnknownKeyword { index: 1, .. }));
    }

    #[test]
    fn test_required_and_blank_must_be_boolean() {
        let err = parse("items:\n  - required: 'yes'\n").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBoolean { key: "required", .. }));
        let err = parse("items:\n  - blank: 1\n").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBoolean { key: "blank", .. }));
    }

    #[test]
    fn test_invalid_dg_type_rejected() {
        let err = parse("items:\n  - dg_type: date\n").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidDgType { value, .. } if value == "date"));
    }

    #[test]
    fn test_bound_requires_dg_type() {
        let err = parse("items:\n  - dg_minimum: 1\n").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::BoundWithoutDgType {
                key: "dg_minimum",
                ..
            }
        ));
        let err = parse("items:\n  - dg_type: string\n    dg_maximum: 1\n").unwrap_err();
        assert!(matches!(err, SchemaError::BoundOnStringType { .. }));
    }

    #[test]
    fn test_bound_must_parse_as_dg_type() {
        let err = parse("items:\n  - dg_type: integer\n    dg_maximum: 1.5\n").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::InvalidBound { value, dg_type: "integer", .. } if value == "1.5"
        ));
        let err = parse("items:\n  - dg_type: float\n    dg_minimum: low\n").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidBound { .. }));
    }

    #[test]
    fn test_bad_pattern_rejected() {
        let err = parse("items:\n  - pattern: '[a-'\n").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidPattern { index: 0, .. }));
    }

    #[test]
    fn test_bad_lengths_and_types_rejected() {
        assert!(parse("items:\n  - minLength: -1\n").is_err());
        assert!(parse("items:\n  - maxLength: ten\n").is_err());
        assert!(parse("items:\n  - type: decimal\n").is_err());
        assert!(parse("items:\n  - enum: []\n").is_err());
        assert!(parse("items:\n  - title: [a]\n").is_err());
    }

    #[test]
    fn test_enum_members_rendered_as_text() {
        let items = parse("items:\n  - enum: [1, 2.5, true, x]\n").unwrap();
        let Rule::Enum(values) = &items[0].rules[0] else {
            panic!("expected enum rule");
        };
        let values: Vec<&str> = values.iter().map(String::as_str).collect();
        assert_eq!(values, vec!["1", "2.5", "true", "x"]);
    }
}
