use crate::{
    Result,
    store::{Item, QueryPage, QueryRequest, Store},
};

use aws_sdk_dynamodb::types;

/// Items and counters accumulated across query pages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AggregatedResult {
    /// Capacity consumed over all pages; `None` when no page reported any.
    pub consumed_capacity: Option<types::ConsumedCapacity>,
    /// Number of items returned after filtering, summed over pages.
    pub count: i32,
    /// Items of every fetched page, in fetch order.
    pub items: Vec<Item>,
    /// Continuation token of the last fetched page, if the query was not exhausted.
    pub last_evaluated_key: Option<Item>,
    /// Number of items evaluated before filtering, summed over pages.
    pub scanned_count: i32,
}

impl AggregatedResult {
    fn extend(&mut self, page: QueryPage) {
        self.items.extend(page.items);
        self.count += page.count;
        self.scanned_count += page.scanned_count;
        self.last_evaluated_key = page.last_evaluated_key;
    }
}

fn aggregate_capacity(capacities: Vec<types::ConsumedCapacity>) -> types::ConsumedCapacity {
    let (total, read, write, table_name) = capacities.into_iter().fold(
        (0.0, 0.0, 0.0, None),
        |(total, read, write, table_name), capacity| {
            (
                total + capacity.capacity_units.unwrap_or(0.0),
                read + capacity.read_capacity_units.unwrap_or(0.0),
                write + capacity.write_capacity_units.unwrap_or(0.0),
                table_name.or(capacity.table_name),
            )
        },
    );
    types::ConsumedCapacity::builder()
        .set_table_name(table_name)
        .set_capacity_units(Some(total))
        .set_read_capacity_units(Some(read))
        .set_write_capacity_units(Some(write))
        .build()
}

/// Run `request` against `store`, following continuation tokens.
///
/// Fetching stops when a page carries no continuation token, after the first
/// page when `pagination` is set, or once `limit` is used up. The limit is
/// decreased by the number of items each page returned and the last page is
/// kept whole, so the result may hold more items than the initial limit.
/// Consumed capacity units are summed over every fetched page.
///
/// A failing round aborts the whole run and no partial result is returned.
pub async fn fetch_all<S: Store>(
    store: &S,
    mut request: QueryRequest,
    pagination: bool,
) -> Result<AggregatedResult> {
    let mut result = AggregatedResult::default();
    let mut capacities = Vec::new();
    loop {
        let mut page = store.query(&request).await?;
        let received = i32::try_from(page.items.len()).unwrap_or(i32::MAX);
        request.options.exclusive_start_key = page.last_evaluated_key.clone();
        capacities.extend(page.consumed_capacity.take());
        result.extend(page);
        if let Some(limit) = request.options.limit.as_mut() {
            *limit = limit.saturating_sub(received);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(
            table_name = %request.table_name,
            received,
            total = result.items.len(),
            remaining = ?request.options.limit,
            "fetched query page"
        );
        let has_more = request.options.exclusive_start_key.is_some();
        let wants_more = !pagination && request.options.limit.is_none_or(|limit| limit > 0);
        if !(has_more && wants_more) {
            break;
        }
    }
    if !capacities.is_empty() {
        result.consumed_capacity = Some(aggregate_capacity(capacities));
    }
    Ok(result)
}
