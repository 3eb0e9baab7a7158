//! Cursor pagination over `list_*` endpoints.

use std::collections::HashSet;
use std::future::Future;

use transit_gateway_sdk::{ListQuery, Page, TransitGatewayError};

/// Follow `next_start` cursors from the first page until the last one and
/// return every item in order.
///
/// Stops early, with a warning, if the server hands back a cursor it already
/// returned.
///
/// ```ignore
/// let gateways = collect_pages(|query| api.list_gateways(query)).await?;
/// ```
///
/// # Errors
/// Returns the first error produced by `fetch`.
pub async fn collect_pages<T, F, Fut>(mut fetch: F) -> Result<Vec<T>, TransitGatewayError>
where
    F: FnMut(ListQuery) -> Fut,
    Fut: Future<Output = Result<Page<T>, TransitGatewayError>>,
{
    let base = ListQuery::default();
    let mut query = base.clone();
    let mut seen_cursors = HashSet::new();
    let mut items = Vec::new();

    loop {
        let page = fetch(query).await?;
        let next = page.next_query(&base);
        items.extend(page.items);

        let Some(next) = next else {
            return Ok(items);
        };
        let cursor = next.start.clone().unwrap_or_default();
        if !seen_cursors.insert(cursor) {
            tracing::warn!(
                items = items.len(),
                "list cursor repeated, stopping pagination"
            );
            return Ok(items);
        }
        query = next;
    }
}
