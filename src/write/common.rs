use crate::store::Item;

use aws_sdk_dynamodb::types;

/// Drop attributes that are `NULL` or an empty string.
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_expr::{store, write};
///
/// let item = store::Item::from([
///     ("id".to_string(), AttributeValue::S("1".to_string())),
///     ("note".to_string(), AttributeValue::S(String::new())),
///     ("parent".to_string(), AttributeValue::Null(true)),
/// ]);
/// let item = write::common::remove_invalid_args(item);
/// assert_eq!(item.len(), 1);
/// ```
pub fn remove_invalid_args(item: Item) -> Item {
    item.into_iter()
        .filter(|(_, value)| match value {
            types::AttributeValue::Null(_) => false,
            types::AttributeValue::S(value) => !value.is_empty(),
            _ => true,
        })
        .collect()
}
