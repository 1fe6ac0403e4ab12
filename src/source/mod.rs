//! Query list loading from a public GitHub repository.
//!
//! The query file is resolved through the contents API (which yields a
//! `download_url` for the default branch) and then fetched raw. Any failure
//! here is fatal to a run: no partial query list is ever produced.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

/// GitHub REST API base, overridable for tests.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

const USER_AGENT: &str = concat!("paaserp/", env!("CARGO_PKG_VERSION"));

/// Errors raised while fetching the query file.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("repository or file not found: {0}")]
    NotFound(String),

    #[error("request to file host failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from file host: {0}")]
    Api(String),
}

/// Contents API entry; only the raw URL matters here.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    download_url: Option<String>,
}

/// Loader for the remote query file.
pub struct QuerySource {
    client: Client,
    api_base: String,
    repo: String,
    path: String,
}

impl QuerySource {
    /// Create a loader for `path` inside the public repository `repo`
    /// ("owner/name").
    pub fn new(repo: &str, path: &str) -> Self {
        Self::with_api_base(repo, path, GITHUB_API_BASE)
    }

    /// Create a loader against a non-default API host (tests).
    pub fn with_api_base(repo: &str, path: &str, api_base: &str) -> Self {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .gzip(true)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            repo: repo.to_string(),
            path: path.to_string(),
        }
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Fetch the query file and split it into trimmed, non-empty lines.
    /// Order and duplicates are preserved.
    pub async fn fetch_queries(&self) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/repos/{}/contents/{}",
            self.api_base, self.repo, self.path
        );
        let resp = self.client.get(&url).send().await?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(format!(
                "{}/{}",
                self.repo, self.path
            )));
        }
        if !resp.status().is_success() {
            return Err(SourceError::Api(format!("HTTP {}", resp.status())));
        }

        let contents: ContentsResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Api(e.to_string()))?;
        let download_url = contents
            .download_url
            .ok_or_else(|| SourceError::Api("contents entry has no download_url".to_string()))?;

        let raw = self.client.get(&download_url).send().await?;
        if !raw.status().is_success() {
            return Err(SourceError::Api(format!(
                "HTTP {} fetching raw file",
                raw.status()
            )));
        }
        let text = raw.text().await?;

        let queries = parse_queries(&text);
        info!(
            repo = %self.repo,
            path = %self.path,
            count = queries.len(),
            "loaded query file"
        );
        Ok(queries)
    }
}

/// Split raw file text into trimmed, non-empty query lines.
pub fn parse_queries(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
