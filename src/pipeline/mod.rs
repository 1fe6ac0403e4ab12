//! Sequential aggregation of PAA results into a flat table.
//!
//! Queries are processed strictly one at a time, in input order. A failed
//! extraction is logged and recorded as an empty result for that query, so a
//! run always yields a full table once the query list has loaded.

use async_trait::async_trait;

use crate::models::{PaaItem, ResultRow, ResultTable};
use crate::serpapi::{SerpClient, SerpError};

/// Source of "People Also Ask" entries for a single query. Seam between the
/// aggregator and the real SerpApi client.
#[async_trait]
pub trait PaaProvider: Send + Sync {
    async fn related_questions(&self, query: &str) -> Result<Vec<PaaItem>, SerpError>;
}

#[async_trait]
impl PaaProvider for SerpClient {
    async fn related_questions(&self, query: &str) -> Result<Vec<PaaItem>, SerpError> {
        SerpClient::related_questions(self, query).await
    }
}

/// Flatten PAA results for `queries` into one table.
///
/// Invariant: every input query produces at least one row; a query with zero
/// items (or a failed call) gets exactly one placeholder row. Repeated
/// queries are processed again, not deduplicated. `on_query` fires before
/// each extraction, for progress display.
pub async fn aggregate<P, F>(queries: &[String], provider: &P, mut on_query: F) -> ResultTable
where
    P: PaaProvider + ?Sized,
    F: FnMut(usize, &str),
{
    let mut rows = Vec::new();

    for (index, query) in queries.iter().enumerate() {
        on_query(index, query);

        let items = match provider.related_questions(query).await {
            Ok(items) => items,
            Err(e) => {
                // Recovered per query: the table shows the same placeholder
                // row as a genuinely empty result, the log keeps the cause.
                tracing::warn!(query = %query, error = %e, "PAA extraction failed, recording empty result");
                Vec::new()
            }
        };

        if items.is_empty() {
            rows.push(ResultRow::placeholder(query));
        } else {
            for item in items {
                rows.push(ResultRow::from_item(query, item));
            }
        }
    }

    ResultTable { rows }
}
