//! SerpApi client for "People Also Ask" extraction.
//!
//! One synchronous-in-spirit request per query: no retries, no pagination,
//! no per-call timeout beyond the client default.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::models::{PaaItem, PLACEHOLDER};

/// SerpApi endpoint base, overridable for tests.
pub const SERPAPI_BASE: &str = "https://serpapi.com";

/// Extractor configuration. Built once from [`crate::config::Settings`] and
/// injected here; the client never reads ambient state.
#[derive(Debug, Clone)]
pub struct SerpConfig {
    pub api_key: String,
    /// Response language hint.
    pub hl: String,
    /// Response region hint.
    pub gl: String,
    /// Result-count hint.
    pub num: u32,
    pub base_url: String,
}

/// Errors raised by the search provider.
#[derive(Debug, Error)]
pub enum SerpError {
    #[error("search request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("search provider error: {0}")]
    Api(String),

    #[error("malformed search response: {0}")]
    Parse(String),
}

/// Search response; only the PAA block and the provider's error field matter.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    related_questions: Vec<RelatedQuestion>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RelatedQuestion {
    question: Option<String>,
    snippet: Option<String>,
    answer: Option<String>,
    link: Option<String>,
}

impl From<RelatedQuestion> for PaaItem {
    fn from(rq: RelatedQuestion) -> Self {
        // Answer text prefers the snippet, falls back to the answer field,
        // then to the placeholder. Empty strings count as absent.
        let answer = rq
            .snippet
            .filter(|s| !s.is_empty())
            .or(rq.answer.filter(|s| !s.is_empty()))
            .unwrap_or_else(|| PLACEHOLDER.to_string());

        Self {
            question: rq.question.unwrap_or_else(|| PLACEHOLDER.to_string()),
            answer,
            link: rq.link.unwrap_or_default(),
        }
    }
}

/// SerpApi client.
pub struct SerpClient {
    client: Client,
    config: SerpConfig,
}

impl SerpClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SerpConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self { client, config }
    }

    /// Fetch the "related questions" blocks for one query. An absent
    /// `related_questions` key is a normal empty result, not an error.
    pub async fn related_questions(&self, query: &str) -> Result<Vec<PaaItem>, SerpError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let num = self.config.num.to_string();
        let params = [
            ("engine", "google"),
            ("q", query),
            ("api_key", self.config.api_key.as_str()),
            ("hl", self.config.hl.as_str()),
            ("gl", self.config.gl.as_str()),
            ("num", num.as_str()),
        ];

        debug!(query = %query, "requesting SERP");
        let resp = self.client.get(&url).query(&params).send().await?;

        if !resp.status().is_success() {
            return Err(SerpError::Api(format!("HTTP {}", resp.status())));
        }

        let body: SearchResponse = resp
            .json()
            .await
            .map_err(|e| SerpError::Parse(e.to_string()))?;

        // SerpApi reports failures inside an otherwise-200 payload too.
        if let Some(message) = body.error {
            return Err(SerpError::Api(message));
        }

        Ok(body.related_questions.into_iter().map(PaaItem::from).collect())
    }
}
