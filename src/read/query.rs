use crate::{
    Result, common,
    common::options::{ExpressionKind, RequestOptions},
    read,
    store::{QueryRequest, Store},
};

use serde::Serialize;

/// Query operation.
///
/// The key condition is built from the partition and sort key arguments, then
/// merged with the caller supplied `options` (their filters are joined after
/// the generated expressions, their scalars win).
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
/// use dynamodb_expr::{common, read};
///
/// # async fn example(client: &Client) -> Result<(), Box<dyn std::error::Error>> {
/// let query = read::query::Query {
///     key_condition: common::condition::KeyCondition {
///         partition_key: "id".to_string(),
///         partition_key_value: Some("1".to_string()),
///         sort_key: Some("ts".to_string()),
///         sort_key_operator: Some("begins with".to_string()),
///         sort_key_value: Some("2024".to_string()),
///     },
///     table_name: "events".to_string(),
///     ..Default::default()
/// };
/// let result = query.send(client).await?;
/// println!("{} items", result.count);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query<T> {
    /// Secondary index to query instead of the base table.
    pub index_name: Option<String>,
    /// Partition key equality and optional sort key comparison.
    pub key_condition: common::condition::KeyCondition<T>,
    /// Raw options merged after the generated ones.
    pub options: Option<RequestOptions>,
    /// Fetch a single page and return its continuation token.
    pub pagination: bool,
    /// The table to query.
    pub table_name: String,
}

impl<T: Serialize> TryFrom<Query<T>> for QueryRequest {
    type Error = crate::Error;

    fn try_from(query: Query<T>) -> Result<Self> {
        let key_condition: common::ExpressionBundle = query.key_condition.try_into()?;
        let generated = RequestOptions {
            index_name: query.index_name,
            ..RequestOptions::from_bundle(ExpressionKind::KeyCondition, key_condition)
        };
        let options = generated.merge(query.options.unwrap_or_default());
        let request = Self {
            options,
            table_name: query.table_name,
        };
        Ok(request)
    }
}

impl<T: Serialize> Query<T> {
    /// Execute the query, following continuation tokens unless `pagination` is set.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "dynamodb_expr.query",
            skip_all,
            fields(table_name = %self.table_name, pagination = self.pagination),
            err
        )
    )]
    pub async fn send<S: Store>(self, store: &S) -> Result<read::common::AggregatedResult> {
        let pagination = self.pagination;
        let request: QueryRequest = self.try_into()?;
        read::common::fetch_all(store, request, pagination).await
    }
}
