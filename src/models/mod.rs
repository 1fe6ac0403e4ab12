//! Data models for paaserp.

use serde::{Deserialize, Serialize};

/// Marker rendered for a missing question or answer.
pub const PLACEHOLDER: &str = "—";

/// One "People Also Ask" entry returned by the search provider for a query.
///
/// Ephemeral: only lives for the duration of one extraction call before
/// being flattened into [`ResultRow`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaaItem {
    pub question: String,
    pub answer: String,
    /// Source URL of the answer, empty when the provider gave none.
    pub link: String,
}

/// One row of the flattened output table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub query: String,
    pub question: String,
    pub answer: String,
    pub source: String,
}

impl ResultRow {
    /// Row emitted for a query that yielded zero PAA entries, so the query
    /// still shows up in the output.
    pub fn placeholder(query: &str) -> Self {
        Self {
            query: query.to_string(),
            question: PLACEHOLDER.to_string(),
            answer: PLACEHOLDER.to_string(),
            source: String::new(),
        }
    }

    pub fn from_item(query: &str, item: PaaItem) -> Self {
        Self {
            query: query.to_string(),
            question: item.question,
            answer: item.answer,
            source: item.link,
        }
    }
}

/// Ordered sequence of result rows: input query order first, provider order
/// within a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    pub rows: Vec<ResultRow>,
}

impl ResultTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct query values in first-seen order.
    pub fn distinct_queries(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for row in &self.rows {
            if !seen.contains(&row.query.as_str()) {
                seen.push(row.query.as_str());
            }
        }
        seen
    }

    /// Rows partitioned by distinct query value, first-seen order preserved.
    ///
    /// Repeated input queries collapse into a single group here; the flat
    /// `rows` view keeps them separate.
    pub fn grouped(&self) -> Vec<(&str, Vec<&ResultRow>)> {
        let mut groups: Vec<(&str, Vec<&ResultRow>)> = Vec::new();
        for row in &self.rows {
            match groups.iter_mut().find(|(q, _)| *q == row.query) {
                Some((_, rows)) => rows.push(row),
                None => groups.push((row.query.as_str(), vec![row])),
            }
        }
        groups
    }
}
