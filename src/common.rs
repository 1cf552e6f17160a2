//! Common utilities for DynamoDB expressions.
//!
//! This module provides the pieces shared by read and write operations:
//! placeholder generation, key conditions and request option merging.

/// Key condition expressions for query operations.
pub mod condition;

/// Placeholder maps built from field maps.
pub mod fields;

/// Key types for identifying items in DynamoDB tables.
pub mod key;

/// Request option bundles and their merge rules.
pub mod options;

use aws_sdk_dynamodb::types;
use std::collections;

pub(crate) fn name_placeholder(field: &str) -> String {
    format!("#{field}")
}

pub(crate) fn value_placeholder(field: &str) -> String {
    format!(":{field}")
}

/// An expression together with the placeholder maps it references.
///
/// ```rust
/// use dynamodb_expr::common;
/// use std::collections;
///
/// let bundle = common::ExpressionBundle {
///     expression: "#id = :id".to_string(),
///     expression_attribute_names: collections::HashMap::from([
///         ("#id".to_string(), "id".to_string()),
///     ]),
///     ..Default::default()
/// };
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpressionBundle {
    /// The expression string, referencing `#name` and `:value` placeholders.
    pub expression: String,
    /// Name placeholders, `#field -> field`.
    pub expression_attribute_names: collections::HashMap<String, String>,
    /// Value placeholders, `:field -> value`.
    pub expression_attribute_values: collections::HashMap<String, types::AttributeValue>,
}

impl ExpressionBundle {
    /// Move the placeholder maps into existing optional maps, returning the expression.
    ///
    /// Empty maps are skipped, DynamoDB rejects empty placeholder maps.
    pub(crate) fn merge_into(
        self,
        names: &mut Option<collections::HashMap<String, String>>,
        values: &mut Option<collections::HashMap<String, types::AttributeValue>>,
    ) -> String {
        if !self.expression_attribute_names.is_empty() {
            match names {
                Some(existing) => existing.extend(self.expression_attribute_names),
                None => *names = Some(self.expression_attribute_names),
            }
        }
        if !self.expression_attribute_values.is_empty() {
            match values {
                Some(existing) => existing.extend(self.expression_attribute_values),
                None => *values = Some(self.expression_attribute_values),
            }
        }
        self.expression
    }
}
