//! Configuration management for paaserp.
//!
//! Settings come from an optional TOML file plus environment overrides. The
//! SerpApi key is only ever read here and handed to the client constructor;
//! nothing deeper in the call graph touches the environment.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::serpapi::{SerpConfig, SERPAPI_BASE};

/// Repository holding the query file, "owner/name" form.
pub const DEFAULT_QUERY_REPO: &str = "thibault60/scraper-SERP";

/// Path of the query file inside the repository's default branch.
pub const DEFAULT_QUERY_FILE: &str = "queries.txt";

/// Config file looked up in the working directory when none is given.
const DEFAULT_CONFIG_FILE: &str = "paaserp.toml";

/// Environment variable carrying the SerpApi key.
const SERPAPI_KEY_VAR: &str = "SERPAPI_KEY";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// GitHub repository holding the query file ("owner/name").
    pub query_repo: String,
    /// Path of the query file inside the repository.
    pub query_file: String,
    /// SerpApi key. Usually supplied via SERPAPI_KEY rather than the file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serpapi_key: Option<String>,
    /// Response language hint.
    pub hl: String,
    /// Response region hint.
    pub gl: String,
    /// Result-count hint sent with each search.
    pub num: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            query_repo: DEFAULT_QUERY_REPO.to_string(),
            query_file: DEFAULT_QUERY_FILE.to_string(),
            serpapi_key: None,
            hl: "fr".to_string(),
            gl: "fr".to_string(),
            num: 10,
        }
    }
}

impl Settings {
    /// Build the extractor configuration, requiring the API key to be set.
    pub fn serp_config(&self) -> anyhow::Result<SerpConfig> {
        let api_key = self
            .serpapi_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "no SerpApi key configured (set {} or serpapi_key in {})",
                    SERPAPI_KEY_VAR,
                    DEFAULT_CONFIG_FILE
                )
            })?;

        Ok(SerpConfig {
            api_key,
            hl: self.hl.clone(),
            gl: self.gl.clone(),
            num: self.num,
            base_url: SERPAPI_BASE.to_string(),
        })
    }
}

/// Load settings from a config file (explicit path, or `paaserp.toml` in the
/// working directory if present) and apply environment overrides.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = match config_path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .map_err(|e| anyhow::anyhow!("cannot read {}: {}", path.display(), e))?;
            toml::from_str(&raw)
                .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path.display(), e))?
        }
        None => {
            let default = Path::new(DEFAULT_CONFIG_FILE);
            if default.exists() {
                let raw = std::fs::read_to_string(default)?;
                toml::from_str(&raw)
                    .map_err(|e| anyhow::anyhow!("invalid config {}: {}", default.display(), e))?
            } else {
                Settings::default()
            }
        }
    };

    if let Ok(key) = std::env::var(SERPAPI_KEY_VAR) {
        if !key.is_empty() {
            settings.serpapi_key = Some(key);
        }
    }

    Ok(settings)
}
