//! paaserp - People Also Ask extraction from Google SERPs.
//!
//! Reads a query list from a public GitHub repository, asks SerpApi for the
//! "related questions" blocks of each query and flattens everything into one
//! exportable table.

mod cache;
mod cli;
mod config;
mod export;
mod models;
mod pipeline;
mod serpapi;
mod server;
mod source;
mod utils;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity
    let default_filter = if cli::is_verbose() {
        "paaserp=info"
    } else {
        "paaserp=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Run CLI
    cli::run().await
}
