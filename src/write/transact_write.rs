use crate::{
    Result,
    store::{Store, TransactOutput, TransactRequest},
};

use aws_sdk_dynamodb::types;

/// Transactional write operation.
///
/// Capacity reporting defaults to `TOTAL` and item collection metrics to `NONE`.
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_expr::write;
/// use serde_json::json;
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let put_item = write::put_item::PutItem {
///     item: json!({"id": "1"}),
///     table_name: "users".to_string(),
///     ..Default::default()
/// };
/// let transact_write = write::transact_write::TransactWrite {
///     transactions: vec![put_item.into_transact_item()?],
///     ..Default::default()
/// };
/// transact_write.send(client).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactWrite {
    /// Idempotency token for the transaction.
    pub client_request_token: Option<String>,
    /// Whether to return the consumed capacity.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to return item collection metrics.
    pub return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    /// The writes to apply atomically.
    pub transactions: Vec<types::TransactWriteItem>,
}

impl From<TransactWrite> for TransactRequest {
    fn from(transact_write: TransactWrite) -> Self {
        Self {
            client_request_token: transact_write.client_request_token,
            return_consumed_capacity: Some(
                transact_write
                    .return_consumed_capacity
                    .unwrap_or(types::ReturnConsumedCapacity::Total),
            ),
            return_item_collection_metrics: Some(
                transact_write
                    .return_item_collection_metrics
                    .unwrap_or(types::ReturnItemCollectionMetrics::None),
            ),
            transact_items: transact_write.transactions,
        }
    }
}

impl TransactWrite {
    /// Execute the transactional write.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_expr.transact_write",
            skip_all,
            fields(transactions = self.transactions.len()),
            err
        )
    )]
    pub async fn send<S: Store>(self, store: &S) -> Result<TransactOutput> {
        let request: TransactRequest = self.into();
        store.transact(&request).await
    }
}
