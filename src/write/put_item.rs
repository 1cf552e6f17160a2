use crate::{
    Result,
    common::options::RequestOptions,
    store::{Item, PutRequest, Store, WriteOutput},
    write,
};

use aws_sdk_dynamodb::types;
use serde::Serialize;
use serde_dynamo::to_item;

/// Attribute holding the creation time in epoch milliseconds.
pub const CREATED_AT: &str = "createdAt";

/// Attribute holding the last update time in epoch milliseconds.
pub const UPDATED_AT: &str = "updatedAt";

/// Put item operation.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_expr::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     auto_timestamp: true,
///     item: json!({"id": "1", "name": "John"}),
///     table_name: "users".to_string(),
///     ..Default::default()
/// };
/// put_item.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutItem<T> {
    /// Set `createdAt` and `updatedAt` to the current time.
    pub auto_timestamp: bool,
    /// The item to put into the table.
    pub item: T,
    /// Raw options (condition, placeholders, return settings).
    pub options: Option<RequestOptions>,
    /// Drop `NULL` and empty string attributes before writing.
    pub remove_invalid_args: bool,
    /// The table to write to.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<PutItem<T>> for PutRequest {
    type Error = crate::Error;

    fn try_from(put_item: PutItem<T>) -> Result<Self> {
        let mut item: Item = to_item(put_item.item)?;
        if put_item.remove_invalid_args {
            item = write::common::remove_invalid_args(item);
        }
        if put_item.auto_timestamp {
            let now = chrono::Utc::now().timestamp_millis();
            let timestamp = types::AttributeValue::N(now.to_string());
            item.insert(CREATED_AT.to_string(), timestamp.clone());
            item.insert(UPDATED_AT.to_string(), timestamp);
        }
        let request = Self {
            item,
            options: put_item.options.unwrap_or_default(),
            table_name: put_item.table_name,
        };
        Ok(request)
    }
}

impl<T: Serialize> PutItem<T> {
    /// Build the request as an element of a transactional write instead of executing it.
    pub fn into_transact_item(self) -> Result<types::TransactWriteItem> {
        let request: PutRequest = self.try_into()?;
        let options = request.options;
        let put = types::Put::builder()
            .table_name(request.table_name)
            .set_item(Some(request.item))
            .set_condition_expression(options.condition_expression)
            .set_expression_attribute_names(options.expression_attribute_names)
            .set_expression_attribute_values(options.expression_attribute_values)
            .build()?;
        Ok(types::TransactWriteItem::builder().put(put).build())
    }

    /// Execute the put item operation.
    ///
    /// The output holds the previous item when `return_values` asks for it.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_expr.put_item",
            skip_all,
            fields(table_name = %self.table_name),
            err
        )
    )]
    pub async fn send<S: Store>(self, store: &S) -> Result<WriteOutput> {
        let request: PutRequest = self.try_into()?;
        store.put(&request).await
    }
}
