//! The store client contract consumed by read and write operations.
//!
//! Operations build requests from expressions and option bundles, then hand
//! them to a [`Store`]. [`aws_sdk_dynamodb::Client`] implements the trait; any
//! other client (or a test double) can too.

use crate::{Result, common::options::RequestOptions, error::Error};

use aws_sdk_dynamodb::{Client, types};
use std::{collections, future::Future};

/// A DynamoDB item, attribute name to attribute value.
pub type Item = collections::HashMap<String, types::AttributeValue>;

/// A put request ready to be executed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PutRequest {
    /// The item to write.
    pub item: Item,
    /// Condition, placeholders and return settings.
    pub options: RequestOptions,
    /// The table to write to.
    pub table_name: String,
}

/// An update request ready to be executed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UpdateRequest {
    /// The primary key of the item to update.
    pub key: Item,
    /// Update expression, condition, placeholders and return settings.
    pub options: RequestOptions,
    /// The table holding the item.
    pub table_name: String,
}

/// A query request ready to be executed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryRequest {
    /// Key condition, filter, placeholders, limit and start key.
    pub options: RequestOptions,
    /// The table to query.
    pub table_name: String,
}

/// One page of query results.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPage {
    /// Capacity consumed by the page, when requested.
    pub consumed_capacity: Option<types::ConsumedCapacity>,
    /// Number of items returned after filtering.
    pub count: i32,
    /// Items in the page.
    pub items: Vec<Item>,
    /// Continuation token; `None` when the query is exhausted.
    pub last_evaluated_key: Option<Item>,
    /// Number of items evaluated before filtering.
    pub scanned_count: i32,
}

/// Response of a single item write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteOutput {
    /// Item attributes selected by `return_values`.
    pub attributes: Option<Item>,
    /// Capacity consumed by the write, when requested.
    pub consumed_capacity: Option<types::ConsumedCapacity>,
    /// Item collection metrics, when requested.
    pub item_collection_metrics: Option<types::ItemCollectionMetrics>,
}

/// Response of a transactional write.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactOutput {
    /// Capacity consumed per table, when requested.
    pub consumed_capacity: Option<Vec<types::ConsumedCapacity>>,
    /// Item collection metrics per table, when requested.
    pub item_collection_metrics:
        Option<collections::HashMap<String, Vec<types::ItemCollectionMetrics>>>,
}

/// A transactional write request ready to be executed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TransactRequest {
    /// Idempotency token for the transaction.
    pub client_request_token: Option<String>,
    /// Whether to return the consumed capacity.
    pub return_consumed_capacity: Option<types::ReturnConsumedCapacity>,
    /// Whether to return item collection metrics.
    pub return_item_collection_metrics: Option<types::ReturnItemCollectionMetrics>,
    /// The writes to apply atomically.
    pub transact_items: Vec<types::TransactWriteItem>,
}

/// Key-value store client able to execute built requests.
///
/// Failures are reported as [`Error::StoreTransport`] and are never retried here.
pub trait Store {
    /// Write a whole item.
    fn put(&self, request: &PutRequest) -> impl Future<Output = Result<WriteOutput>> + Send;

    /// Update an item.
    fn update(&self, request: &UpdateRequest) -> impl Future<Output = Result<WriteOutput>> + Send;

    /// Fetch a single page of a query.
    fn query(&self, request: &QueryRequest) -> impl Future<Output = Result<QueryPage>> + Send;

    /// Apply a list of writes atomically.
    fn transact(
        &self,
        request: &TransactRequest,
    ) -> impl Future<Output = Result<TransactOutput>> + Send;
}

impl Store for Client {
    async fn put(&self, request: &PutRequest) -> Result<WriteOutput> {
        let options = request.options.clone();
        let output = self
            .put_item()
            .table_name(&request.table_name)
            .set_item(Some(request.item.clone()))
            .set_condition_expression(options.condition_expression)
            .set_expression_attribute_names(options.expression_attribute_names)
            .set_expression_attribute_values(options.expression_attribute_values)
            .set_return_consumed_capacity(options.return_consumed_capacity)
            .set_return_item_collection_metrics(options.return_item_collection_metrics)
            .set_return_values(options.return_values)
            .send()
            .await
            .map_err(Error::store)?;
        let output = WriteOutput {
            attributes: output.attributes,
            consumed_capacity: output.consumed_capacity,
            item_collection_metrics: output.item_collection_metrics,
        };
        Ok(output)
    }

    async fn update(&self, request: &UpdateRequest) -> Result<WriteOutput> {
        let options = request.options.clone();
        let output = self
            .update_item()
            .table_name(&request.table_name)
            .set_key(Some(request.key.clone()))
            .set_update_expression(options.update_expression)
            .set_condition_expression(options.condition_expression)
            .set_expression_attribute_names(options.expression_attribute_names)
            .set_expression_attribute_values(options.expression_attribute_values)
            .set_return_consumed_capacity(options.return_consumed_capacity)
            .set_return_item_collection_metrics(options.return_item_collection_metrics)
            .set_return_values(options.return_values)
            .send()
            .await
            .map_err(Error::store)?;
        let output = WriteOutput {
            attributes: output.attributes,
            consumed_capacity: output.consumed_capacity,
            item_collection_metrics: output.item_collection_metrics,
        };
        Ok(output)
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryPage> {
        let options = request.options.clone();
        let output = self
            .query()
            .table_name(&request.table_name)
            .set_consistent_read(options.consistent_read)
            .set_exclusive_start_key(options.exclusive_start_key)
            .set_expression_attribute_names(options.expression_attribute_names)
            .set_expression_attribute_values(options.expression_attribute_values)
            .set_filter_expression(options.filter_expression)
            .set_index_name(options.index_name)
            .set_key_condition_expression(options.key_condition_expression)
            .set_limit(options.limit)
            .set_projection_expression(options.projection_expression)
            .set_return_consumed_capacity(options.return_consumed_capacity)
            .set_scan_index_forward(options.scan_index_forward)
            .set_select(options.select)
            .send()
            .await
            .map_err(Error::store)?;
        let page = QueryPage {
            consumed_capacity: output.consumed_capacity,
            count: output.count,
            items: output.items.unwrap_or_default(),
            last_evaluated_key: output.last_evaluated_key,
            scanned_count: output.scanned_count,
        };
        Ok(page)
    }

    async fn transact(&self, request: &TransactRequest) -> Result<TransactOutput> {
        let request = request.clone();
        let output = self
            .transact_write_items()
            .set_transact_items(Some(request.transact_items))
            .set_client_request_token(request.client_request_token)
            .set_return_consumed_capacity(request.return_consumed_capacity)
            .set_return_item_collection_metrics(request.return_item_collection_metrics)
            .send()
            .await
            .map_err(Error::store)?;
        let output = TransactOutput {
            consumed_capacity: output.consumed_capacity,
            item_collection_metrics: output.item_collection_metrics,
        };
        Ok(output)
    }
}
