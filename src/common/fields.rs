use crate::{Result, common, error::Error};

use aws_sdk_dynamodb::types;
use indexmap::IndexMap;
use serde::Serialize;
use serde_dynamo::to_attribute_value;
use std::collections;

/// Prefix marking a field as an atomic increment or append target.
pub const INCREMENT_PREFIX: char = '+';

/// Ordered mapping from field name to raw value.
///
/// Values serializing to `NULL` (e.g. `None` or `serde_json::Value::Null`) mark deletions.
pub type FieldMap<T> = IndexMap<String, T>;

pub(crate) fn strip_prefix(field: &str) -> (&str, bool) {
    match field.strip_prefix(INCREMENT_PREFIX) {
        Some(stripped) => (stripped, true),
        None => (field, false),
    }
}

pub(crate) fn is_deletion(value: &types::AttributeValue) -> bool {
    matches!(value, types::AttributeValue::Null(_))
}

/// Remove the leading `+` from every field name, keeping the values.
///
/// When a prefixed and an unprefixed name collapse onto the same field, the
/// later entry's value wins while the earlier entry's position is kept.
///
/// ```rust
/// use dynamodb_expr::common::fields;
///
/// let fields = fields::FieldMap::from([("+count".to_string(), 1)]);
/// let stripped = fields::strip_increment_prefix(fields);
/// assert_eq!(stripped.get("count"), Some(&1));
/// ```
pub fn strip_increment_prefix<T>(fields: FieldMap<T>) -> FieldMap<T> {
    let mut stripped = IndexMap::with_capacity(fields.len());
    for (field, value) in fields {
        let (field, _) = strip_prefix(&field);
        stripped.insert(field.to_string(), value);
    }
    stripped
}

/// Build `#field -> field` for every field, ignoring any increment prefix.
pub fn build_name_placeholders<T>(fields: &FieldMap<T>) -> collections::HashMap<String, String> {
    fields
        .keys()
        .map(|field| {
            let (field, _) = strip_prefix(field);
            (common::name_placeholder(field), field.to_string())
        })
        .collect()
}

/// Sort key operators understood by key conditions.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// `=`
    Equals,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// Prefix match, `begins_with`.
    BeginsWith,
    /// Inclusive range match.
    Between,
}

impl Operator {
    /// Normalize an operator string.
    ///
    /// Matching is case-insensitive and any string containing both `begin` and
    /// `with` is read as [`Operator::BeginsWith`]. Unknown operators yield `None`.
    ///
    /// ```rust
    /// use dynamodb_expr::common::fields::Operator;
    ///
    /// assert_eq!(Operator::parse("Begins With"), Some(Operator::BeginsWith));
    /// assert_eq!(Operator::parse("BETWEEN"), Some(Operator::Between));
    /// assert_eq!(Operator::parse("<>"), None);
    /// ```
    pub fn parse(operator: &str) -> Option<Self> {
        let operator = operator.to_lowercase();
        if operator.contains("begin") && operator.contains("with") {
            return Some(Self::BeginsWith);
        }
        match operator.as_str() {
            "=" => Some(Self::Equals),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            "between" => Some(Self::Between),
            _ => None,
        }
    }

    /// Build the clause comparing `field` against its value placeholders.
    pub(crate) fn clause(self, field: &str) -> String {
        let name = common::name_placeholder(field);
        let value = common::value_placeholder(field);
        match self {
            Self::Equals => format!("{name} = {value}"),
            Self::LessThan => format!("{name} < {value}"),
            Self::LessThanOrEqual => format!("{name} <= {value}"),
            Self::GreaterThan => format!("{name} > {value}"),
            Self::GreaterThanOrEqual => format!("{name} >= {value}"),
            Self::BeginsWith => format!("begins_with ( {name}, {value} )"),
            Self::Between => format!("{name} BETWEEN {value}From AND {value}To"),
        }
    }
}

/// Build `:field -> value` for every field that is not a deletion.
///
/// With `operator` equal to `between` (case-insensitive), a field whose value is
/// a list of exactly two elements yields `:fieldFrom` and `:fieldTo` instead.
/// Fails with [`Error::InvalidRangeOperator`] when `between` is requested and
/// no field holds such a pair.
///
/// ```rust
/// use dynamodb_expr::common::fields;
/// use serde_json::json;
///
/// let fields = fields::FieldMap::from([("x".to_string(), json!([1, 5]))]);
/// let values = fields::build_value_placeholders(&fields, Some("between")).unwrap();
/// assert!(values.contains_key(":xFrom") && values.contains_key(":xTo"));
/// ```
pub fn build_value_placeholders<T: Serialize>(
    fields: &FieldMap<T>,
    operator: Option<&str>,
) -> Result<collections::HashMap<String, types::AttributeValue>> {
    let is_between = operator.is_some_and(|operator| operator.eq_ignore_ascii_case("between"));
    let mut values = collections::HashMap::with_capacity(fields.len());
    let mut has_range = false;
    for (field, value) in fields {
        let (field, _) = strip_prefix(field);
        let placeholder = common::value_placeholder(field);
        let value: types::AttributeValue = to_attribute_value(value)?;
        match value {
            types::AttributeValue::L(mut range) if is_between && range.len() == 2 => {
                let to = range.pop();
                let from = range.pop();
                if let (Some(from), Some(to)) = (from, to) {
                    values.insert(format!("{placeholder}From"), from);
                    values.insert(format!("{placeholder}To"), to);
                    has_range = true;
                }
            }
            value if is_deletion(&value) => {}
            value => {
                values.insert(placeholder, value);
            }
        }
    }
    if is_between && !has_range {
        return Err(Error::InvalidRangeOperator);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;
    use serde_json::{Value, json};

    fn field_map(fields: &[(&str, Value)]) -> FieldMap<Value> {
        fields
            .iter()
            .map(|(field, value)| (field.to_string(), value.clone()))
            .collect()
    }

    #[rstest]
    #[case::empty(&[], vec![])]
    #[case::no_prefix(&[("b", json!(2)), ("a", json!(1))], vec!["b", "a"])]
    #[case::prefix(&[("b", json!(2)), ("+a", json!(1))], vec!["b", "a"])]
    #[case::prefix_keeps_position(
        &[("+z", json!(1)), ("m", json!(2)), ("+a", json!(3))],
        vec!["z", "m", "a"]
    )]
    #[case::double_prefix_keeps_second(&[("++a", json!(1))], vec!["+a"])]
    fn test_strip_increment_prefix(#[case] fields: &[(&str, Value)], #[case] expected: Vec<&str>) {
        let actual = strip_increment_prefix(field_map(fields));
        let actual: Vec<_> = actual.keys().map(String::as_str).collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_strip_increment_prefix_collision_last_value_wins() {
        let fields = FieldMap::from([("a".to_string(), 1), ("+a".to_string(), 2)]);
        let actual = strip_increment_prefix(fields);
        assert_eq!(actual, FieldMap::from([("a".to_string(), 2)]));
    }

    #[rstest]
    #[case::empty(&[], collections::HashMap::new())]
    #[case::plain(
        &[("a", json!(1)), ("b", Value::Null)],
        collections::HashMap::from(
            [
                ("#a".to_string(), "a".to_string()),
                ("#b".to_string(), "b".to_string()),
            ]
        )
    )]
    #[case::prefixed_and_unprefixed(
        &[("+a", json!(1)), ("a", json!(2))],
        collections::HashMap::from(
            [
                ("#a".to_string(), "a".to_string()),
            ]
        )
    )]
    fn test_build_name_placeholders(
        #[case] fields: &[(&str, Value)],
        #[case] expected: collections::HashMap<String, String>,
    ) {
        let actual = build_name_placeholders(&field_map(fields));
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::between(
        &[("x", json!([1, 5]))],
        Some("between"),
        collections::HashMap::from(
            [
                (":xFrom".to_string(), types::AttributeValue::N("1".to_string())),
                (":xTo".to_string(), types::AttributeValue::N("5".to_string())),
            ]
        )
    )]
    #[case::between_upper_case(
        &[("x", json!(["a", "b"]))],
        Some("BETWEEN"),
        collections::HashMap::from(
            [
                (":xFrom".to_string(), types::AttributeValue::S("a".to_string())),
                (":xTo".to_string(), types::AttributeValue::S("b".to_string())),
            ]
        )
    )]
    #[case::list_not_split(
        &[("x", json!([1, 5]))],
        Some("="),
        collections::HashMap::from(
            [
                (
                    ":x".to_string(),
                    types::AttributeValue::L(
                        vec![
                            types::AttributeValue::N("1".to_string()),
                            types::AttributeValue::N("5".to_string()),
                        ]
                    )
                ),
            ]
        )
    )]
    #[case::null_skipped(
        &[("a", json!("b")), ("c", Value::Null)],
        None,
        collections::HashMap::from(
            [
                (":a".to_string(), types::AttributeValue::S("b".to_string())),
            ]
        )
    )]
    #[case::prefix_stripped(
        &[("+count", json!(3))],
        None,
        collections::HashMap::from(
            [
                (":count".to_string(), types::AttributeValue::N("3".to_string())),
            ]
        )
    )]
    #[case::between_with_other_fields(
        &[("id", json!("a")), ("ts", json!([1, 2]))],
        Some("between"),
        collections::HashMap::from(
            [
                (":id".to_string(), types::AttributeValue::S("a".to_string())),
                (":tsFrom".to_string(), types::AttributeValue::N("1".to_string())),
                (":tsTo".to_string(), types::AttributeValue::N("2".to_string())),
            ]
        )
    )]
    fn test_build_value_placeholders(
        #[case] fields: &[(&str, Value)],
        #[case] operator: Option<&str>,
        #[case] expected: collections::HashMap<String, types::AttributeValue>,
    ) {
        let actual = build_value_placeholders(&field_map(fields), operator).unwrap();
        assert_eq!(actual, expected);
    }

    #[rstest]
    #[case::scalar(&[("x", json!(5))])]
    #[case::three_elements(&[("x", json!([1, 2, 3]))])]
    #[case::empty(&[])]
    fn test_build_value_placeholders_invalid_range(#[case] fields: &[(&str, Value)]) {
        let actual = build_value_placeholders(&field_map(fields), Some("between"));
        assert!(matches!(actual, Err(Error::InvalidRangeOperator)));
    }

    #[rstest]
    #[case::equals("=", Some(Operator::Equals))]
    #[case::less_than("<", Some(Operator::LessThan))]
    #[case::less_than_or_equal("<=", Some(Operator::LessThanOrEqual))]
    #[case::greater_than(">", Some(Operator::GreaterThan))]
    #[case::greater_than_or_equal(">=", Some(Operator::GreaterThanOrEqual))]
    #[case::begins_with_spaced("begins with", Some(Operator::BeginsWith))]
    #[case::begins_with_snake("BEGINS_WITH", Some(Operator::BeginsWith))]
    #[case::begins_with_reversed("with begin", Some(Operator::BeginsWith))]
    #[case::between("Between", Some(Operator::Between))]
    #[case::unknown("<>", None)]
    fn test_operator_parse(#[case] operator: &str, #[case] expected: Option<Operator>) {
        assert_eq!(Operator::parse(operator), expected);
    }
}
