use crate::{Result, error::Error, store::Item};

use aws_sdk_dynamodb::types;
use serde::{de::DeserializeOwned, de::Error as _};
use serde_dynamo::from_item;

/// Flatten the new image of a change stream record into a plain item.
///
/// Only string and number attributes are accepted; a missing image or any
/// other attribute type is reported as [`Error::MalformedInput`].
///
/// ```rust
/// use aws_sdk_dynamodb::types::AttributeValue;
/// use dynamodb_expr::{read, store};
/// use serde_json::{Value, json};
///
/// let new_image = store::Item::from([
///     ("id".to_string(), AttributeValue::S("1".to_string())),
///     ("name".to_string(), AttributeValue::S("Jane".to_string())),
/// ]);
/// let item: Value = read::stream::parse_new_image(Some(new_image)).unwrap();
/// assert_eq!(item, json!({"id": "1", "name": "Jane"}));
/// ```
pub fn parse_new_image<T: DeserializeOwned>(new_image: Option<Item>) -> Result<T> {
    let new_image = new_image
        .ok_or_else(|| serde_dynamo::Error::custom("stream record has no new image"))?;
    let unsupported = new_image.iter().find(|(_, value)| {
        !matches!(value, types::AttributeValue::S(_) | types::AttributeValue::N(_))
    });
    if let Some((name, _)) = unsupported {
        let message = format!("attribute `{name}` is neither a string nor a number");
        return Err(Error::MalformedInput(serde_dynamo::Error::custom(message)));
    }
    let item = from_item(new_image)?;
    Ok(item)
}
