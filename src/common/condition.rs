use crate::{Result, common, error::Error};

use crate::common::fields::{self, Operator};
use serde::Serialize;

/// Separator joining the partition key and sort key clauses.
const AND: &str = " AND ";

/// Arguments for a key condition expression.
///
/// The sort key operator is normalized with [`Operator::parse`]. An operator
/// that is not recognized drops the sort key clause, leaving a partition key
/// only condition.
///
/// ```rust
/// use dynamodb_expr::common::{self, condition};
///
/// let key_condition = condition::KeyCondition {
///     partition_key: "id".to_string(),
///     partition_key_value: Some(1),
///     sort_key: Some("ts".to_string()),
///     sort_key_operator: Some(">=".to_string()),
///     sort_key_value: Some(1700),
/// };
/// let bundle: common::ExpressionBundle = key_condition.try_into().unwrap();
/// assert_eq!(bundle.expression, "#id = :id AND #ts >= :ts");
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct KeyCondition<T> {
    /// The partition key attribute name.
    pub partition_key: String,
    /// The partition key value.
    pub partition_key_value: Option<T>,
    /// The sort key attribute name.
    pub sort_key: Option<String>,
    /// The comparison to apply to the sort key, e.g. `=`, `<=`, `begins with`, `between`.
    pub sort_key_operator: Option<String>,
    /// The sort key value; a two element list for `between`.
    pub sort_key_value: Option<T>,
}

impl<T: Serialize> TryFrom<KeyCondition<T>> for common::ExpressionBundle {
    type Error = Error;

    fn try_from(key_condition: KeyCondition<T>) -> Result<Self> {
        if key_condition.partition_key.is_empty() {
            return Err(Error::MissingPartitionKey);
        }
        let partition_key_value = key_condition
            .partition_key_value
            .ok_or(Error::MissingPartitionKey)?;
        let partition_fields =
            fields::FieldMap::from([(key_condition.partition_key.clone(), partition_key_value)]);
        let mut expression_attribute_values =
            fields::build_value_placeholders(&partition_fields, None)?;
        if expression_attribute_values.is_empty() {
            // the value serialized to NULL
            return Err(Error::MissingPartitionKey);
        }
        let mut expression_attribute_names = fields::build_name_placeholders(&partition_fields);
        let mut expression = Operator::Equals.clause(&key_condition.partition_key);

        let sort_key = key_condition.sort_key.filter(|sort_key| !sort_key.is_empty());
        if let Some(sort_key) = sort_key {
            let (Some(raw_operator), Some(sort_key_value)) =
                (key_condition.sort_key_operator, key_condition.sort_key_value)
            else {
                return Err(Error::MissingSortKeyArgs(sort_key));
            };
            let sort_fields = fields::FieldMap::from([(sort_key.clone(), sort_key_value)]);
            let sort_values =
                fields::build_value_placeholders(&sort_fields, Some(raw_operator.as_str()))?;
            if sort_values.is_empty() {
                return Err(Error::MissingSortKeyArgs(sort_key));
            }
            expression_attribute_names.extend(fields::build_name_placeholders(&sort_fields));
            expression_attribute_values.extend(sort_values);
            match Operator::parse(&raw_operator) {
                Some(operator) => {
                    expression.push_str(AND);
                    expression.push_str(&operator.clause(&sort_key));
                }
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        sort_key = %sort_key,
                        operator = %raw_operator,
                        "unrecognized sort key operator, querying on the partition key only"
                    );
                }
            }
        }
        let bundle = Self {
            expression,
            expression_attribute_names,
            expression_attribute_values,
        };
        Ok(bundle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use aws_sdk_dynamodb::types;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::collections;

    fn key_condition(
        sort_key: Option<&str>,
        sort_key_operator: Option<&str>,
        sort_key_value: Option<Value>,
    ) -> KeyCondition<Value> {
        KeyCondition {
            partition_key: "id".to_string(),
            partition_key_value: Some(json!(1)),
            sort_key: sort_key.map(str::to_string),
            sort_key_operator: sort_key_operator.map(str::to_string),
            sort_key_value,
        }
    }

    #[rstest]
    #[case::partition_key_only(key_condition(None, None, None), "#id = :id")]
    #[case::equals(key_condition(Some("ts"), Some("="), Some(json!(5))), "#id = :id AND #ts = :ts")]
    #[case::less_than(key_condition(Some("ts"), Some("<"), Some(json!(5))), "#id = :id AND #ts < :ts")]
    #[case::less_than_or_equal(
        key_condition(Some("ts"), Some("<="), Some(json!(5))),
        "#id = :id AND #ts <= :ts"
    )]
    #[case::greater_than(key_condition(Some("ts"), Some(">"), Some(json!(5))), "#id = :id AND #ts > :ts")]
    #[case::greater_than_or_equal(
        key_condition(Some("ts"), Some(">="), Some(json!(5))),
        "#id = :id AND #ts >= :ts"
    )]
    #[case::begins_with(
        key_condition(Some("ts"), Some("begins with"), Some(json!("2024"))),
        "#id = :id AND begins_with ( #ts, :ts )"
    )]
    #[case::between(
        key_condition(Some("ts"), Some("between"), Some(json!([1, 9]))),
        "#id = :id AND #ts BETWEEN :tsFrom AND :tsTo"
    )]
    #[case::unknown_operator(key_condition(Some("ts"), Some("<>"), Some(json!(5))), "#id = :id")]
    #[case::empty_sort_key_ignored(key_condition(Some(""), None, None), "#id = :id")]
    fn test_key_condition_expression(#[case] args: KeyCondition<Value>, #[case] expected: &str) {
        let actual: common::ExpressionBundle = args.try_into().unwrap();
        assert_eq!(actual.expression, expected);
    }

    #[test]
    fn test_key_condition_begins_with_placeholders() {
        let args = KeyCondition {
            partition_key: "id".to_string(),
            partition_key_value: Some(json!(1)),
            sort_key: Some("ts".to_string()),
            sort_key_operator: Some("begins with".to_string()),
            sort_key_value: Some(json!("2024")),
        };
        let actual: common::ExpressionBundle = args.try_into().unwrap();
        let expected = common::ExpressionBundle {
            expression: "#id = :id AND begins_with ( #ts, :ts )".to_string(),
            expression_attribute_names: collections::HashMap::from([
                ("#id".to_string(), "id".to_string()),
                ("#ts".to_string(), "ts".to_string()),
            ]),
            expression_attribute_values: collections::HashMap::from([
                (":id".to_string(), types::AttributeValue::N("1".to_string())),
                (":ts".to_string(), types::AttributeValue::S("2024".to_string())),
            ]),
        };
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_key_condition_between_placeholders() {
        let args = key_condition(Some("ts"), Some("BETWEEN"), Some(json!([1, 9])));
        let actual: common::ExpressionBundle = args.try_into().unwrap();
        assert_eq!(
            actual.expression_attribute_values,
            collections::HashMap::from([
                (":id".to_string(), types::AttributeValue::N("1".to_string())),
                (":tsFrom".to_string(), types::AttributeValue::N("1".to_string())),
                (":tsTo".to_string(), types::AttributeValue::N("9".to_string())),
            ])
        );
    }

    #[test]
    fn test_key_condition_unknown_operator_keeps_placeholders() {
        let args = key_condition(Some("ts"), Some("~"), Some(json!(5)));
        let actual: common::ExpressionBundle = args.try_into().unwrap();
        assert!(actual.expression_attribute_names.contains_key("#ts"));
        assert!(actual.expression_attribute_values.contains_key(":ts"));
    }

    #[rstest]
    #[case::empty_partition_key(
        KeyCondition {
            partition_key: String::new(),
            partition_key_value: Some(json!(1)),
            ..Default::default()
        }
    )]
    #[case::missing_partition_key_value(
        KeyCondition {
            partition_key: "id".to_string(),
            partition_key_value: None,
            ..Default::default()
        }
    )]
    #[case::null_partition_key_value(
        KeyCondition {
            partition_key: "id".to_string(),
            partition_key_value: Some(Value::Null),
            ..Default::default()
        }
    )]
    fn test_key_condition_missing_partition_key(#[case] args: KeyCondition<Value>) {
        let actual: Result<common::ExpressionBundle> = args.try_into();
        assert!(matches!(actual, Err(Error::MissingPartitionKey)));
    }

    #[rstest]
    #[case::missing_operator(key_condition(Some("ts"), None, Some(json!(5))))]
    #[case::missing_value(key_condition(Some("ts"), Some("="), None))]
    #[case::null_value(key_condition(Some("ts"), Some("="), Some(Value::Null)))]
    fn test_key_condition_missing_sort_key_args(#[case] args: KeyCondition<Value>) {
        let actual: Result<common::ExpressionBundle> = args.try_into();
        assert!(matches!(actual, Err(Error::MissingSortKeyArgs(sort_key)) if sort_key == "ts"));
    }

    #[test]
    fn test_key_condition_between_without_range() {
        let args = key_condition(Some("ts"), Some("between"), Some(json!(5)));
        let actual: Result<common::ExpressionBundle> = args.try_into();
        assert!(matches!(actual, Err(Error::InvalidRangeOperator)));
    }
}
