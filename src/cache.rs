//! In-memory memoization of aggregated result tables.
//!
//! Keyed by the full query list (value equality), so repeated UI actions on
//! an unchanged list re-issue zero provider calls. Unbounded and
//! process-lifetime: entries only go away through [`ResultCache::clear`] or a
//! restart.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};

use crate::models::ResultTable;

/// Explicit cache object owned by the pipeline's caller; there is no global
/// registry.
pub struct ResultCache {
    tables: RwLock<HashMap<Vec<String>, Arc<ResultTable>>>,
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }

    /// Get the cached table for this exact query list, if present.
    pub fn get(&self, queries: &[String]) -> Option<Arc<ResultTable>> {
        self.tables
            .read()
            .ok()
            .and_then(|guard| guard.get(queries).cloned())
    }

    /// Store a table under its query list and return the shared handle.
    pub fn insert(&self, queries: Vec<String>, table: ResultTable) -> Arc<ResultTable> {
        let table = Arc::new(table);
        if let Ok(mut guard) = self.tables.write() {
            guard.insert(queries, table.clone());
        }
        table
    }

    /// Return the cached table for `queries`, or run `compute` and cache its
    /// output. The lock is never held across the computation.
    pub async fn get_or_compute<F, Fut>(&self, queries: &[String], compute: F) -> Arc<ResultTable>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ResultTable>,
    {
        if let Some(table) = self.get(queries) {
            tracing::debug!(queries = queries.len(), "result table cache hit");
            return table;
        }
        let table = compute().await;
        self.insert(queries.to_vec(), table)
    }

    /// Drop every cached table.
    pub fn clear(&self) {
        if let Ok(mut guard) = self.tables.write() {
            guard.clear();
        }
    }

    /// Number of cached tables.
    pub fn len(&self) -> usize {
        self.tables.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}
