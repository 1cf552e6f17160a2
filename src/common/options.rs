use crate::common;

use aws_sdk_dynamodb::types;
use std::collections;

/// The expression slots a request can carry.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ExpressionKind {
    /// `ConditionExpression`, gating a write.
    Condition,
    /// `FilterExpression`, applied to read results.
    Filter,
    /// `KeyConditionExpression`, selecting items by key.
    KeyCondition,
    /// `ProjectionExpression`, listing the attributes to return.
    Projection,
    /// `UpdateExpression`, describing item changes.
    Update,
}

impl ExpressionKind {
    /// Separator used when two expressions of this kind are merged.
    pub fn separator(self) -> &'static str {
        match self {
            Self::Projection => ", ",
            Self::Condition | Self::Filter | Self::KeyCondition | Self::Update => " AND ",
        }
    }

    fn merge(self, left: Option<String>, right: Option<String>) -> Option<String> {
        match (left, right) {
            (Some(left), Some(right)) if left.is_empty() => Some(right),
            (Some(left), Some(right)) if right.is_empty() => Some(left),
            (Some(left), Some(right)) => Some(format!("{left}{}{right}", self.separator())),
            (left, right) => left.or(right),
        }
    }
}

/// Request option bundle: expressions, placeholder maps and scalar request settings.
///
/// Bundles are built per call and merged at most once with the bundle generated
/// by an operation, see [`RequestOptions::merge`].
///
/// ```rust
/// use dynamodb_expr::common::options::RequestOptions;
///
/// let generated = RequestOptions {
///     filter_expression: Some("#a = :a".to_string()),
///     limit: Some(5),
///     ..Default::default()
/// };
/// let raw = RequestOptions {
///     filter_expression: Some("#b = :b".to_string()),
///     limit: Some(10),
///     ..Default::default()
/// };
/// let merged = generated.merge(raw);
/// assert_eq!(merged.filter_expression.as_deref(), Some("#a = :a AND #b = :b"));
/// assert_eq!(merged.limit, Some(10));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOptions {
    /// Condition that must hold for a write to succeed.
    pub condition_expression: Option<String>,
    /// Whether to use a strongly consistent read.
    pub consistent_read: Option<bool>,
    /// Key to resume a paginated read from.
    pub exclusive_start_key: Option<collections::HashMap<String, types::AttributeValue>>,
    /// Name placeholders, `#field -> field`.
    pub expression_attribute_names: Option<collections::HashMap<String, String>>,
    /// Value placeholders, `:field -> value`.
    pub expression_attribute_values: Option<collections::HashMap<String, types::AttributeValue>>,
    /// Filter applied to read results.
    pub filter_expression: Option<String>,
    /// Secondary index to read from.
    pub index_name: Option<String>,
    /// Key condition selecting items.
    pub key_condition_expression: Option<String>,
    /// Maximum number of items to evaluate.
    pub limit: Option<i32>,
    /// Attributes to return.
    pub projection_expression: Option<String>,
    /// Whether to return the consumed capacity.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to return item collection metrics.
    pub return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    /// Which item attributes to return from a write.
    pub return_values: Option<types::ReturnValue>,
    /// Whether to traverse the index forward.
    pub scan_index_forward: Option<bool>,
    /// Which attributes a read returns.
    pub select: Option<types::Select>,
    /// Changes applied by an update.
    pub update_expression: Option<String>,
}

fn union<V>(
    left: Option<collections::HashMap<String, V>>,
    right: Option<collections::HashMap<String, V>>,
) -> Option<collections::HashMap<String, V>> {
    match (left, right) {
        (Some(mut left), Some(right)) => {
            left.extend(right);
            Some(left)
        }
        (left, right) => left.or(right),
    }
}

impl RequestOptions {
    /// Get the expression stored for `kind`.
    pub fn expression(&self, kind: ExpressionKind) -> Option<&str> {
        match kind {
            ExpressionKind::Condition => self.condition_expression.as_deref(),
            ExpressionKind::Filter => self.filter_expression.as_deref(),
            ExpressionKind::KeyCondition => self.key_condition_expression.as_deref(),
            ExpressionKind::Projection => self.projection_expression.as_deref(),
            ExpressionKind::Update => self.update_expression.as_deref(),
        }
    }

    /// Build options holding a single expression and its placeholders.
    pub fn from_bundle(kind: ExpressionKind, bundle: common::ExpressionBundle) -> Self {
        let mut options = Self::default();
        let expression = bundle.merge_into(
            &mut options.expression_attribute_names,
            &mut options.expression_attribute_values,
        );
        let slot = match kind {
            ExpressionKind::Condition => &mut options.condition_expression,
            ExpressionKind::Filter => &mut options.filter_expression,
            ExpressionKind::KeyCondition => &mut options.key_condition_expression,
            ExpressionKind::Projection => &mut options.projection_expression,
            ExpressionKind::Update => &mut options.update_expression,
        };
        *slot = Some(expression);
        options
    }

    /// Merge `other` into `self`.
    ///
    /// Placeholder maps are unioned with `other` winning on collisions. Expressions
    /// of the same kind are joined as `self` then `other`. Any scalar set in
    /// `other` overwrites the one in `self`.
    pub fn merge(self, other: Self) -> Self {
        Self {
            condition_expression: ExpressionKind::Condition
                .merge(self.condition_expression, other.condition_expression),
            consistent_read: other.consistent_read.or(self.consistent_read),
            exclusive_start_key: other.exclusive_start_key.or(self.exclusive_start_key),
            expression_attribute_names: union(
                self.expression_attribute_names,
                other.expression_attribute_names,
            ),
            expression_attribute_values: union(
                self.expression_attribute_values,
                other.expression_attribute_values,
            ),
            filter_expression: ExpressionKind::Filter
                .merge(self.filter_expression, other.filter_expression),
            index_name: other.index_name.or(self.index_name),
            key_condition_expression: ExpressionKind::KeyCondition
                .merge(self.key_condition_expression, other.key_condition_expression),
            limit: other.limit.or(self.limit),
            projection_expression: ExpressionKind::Projection
                .merge(self.projection_expression, other.projection_expression),
            return_consumed_capacity: other
                .return_consumed_capacity
                .or(self.return_consumed_capacity),
            return_item_collection_metrics: other
                .return_item_collection_metrics
                .or(self.return_item_collection_metrics),
            return_values: other.return_values.or(self.return_values),
            scan_index_forward: other.scan_index_forward.or(self.scan_index_forward),
            select: other.select.or(self.select),
            update_expression: ExpressionKind::Update
                .merge(self.update_expression, other.update_expression),
        }
    }

    /// Merge two optional bundles; an absent side yields the other unchanged.
    pub fn merge_optional(left: Option<Self>, right: Option<Self>) -> Option<Self> {
        match (left, right) {
            (Some(left), Some(right)) => Some(left.merge(right)),
            (left, right) => left.or(right),
        }
    }
}
