//! CLI commands implementation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config::{load_settings, Settings};
use crate::export;
use crate::pipeline::aggregate;
use crate::serpapi::SerpClient;
use crate::source::QuerySource;

#[derive(Parser)]
#[command(name = "paaserp")]
#[command(about = "People Also Ask extraction from Google SERPs")]
#[command(version)]
pub struct Cli {
    /// Configuration file (default: ./paaserp.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Export format for the `run` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
enum ExportFormat {
    #[default]
    Csv,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the query list, extract PAA results and export the table
    Run {
        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Export format
        #[arg(short, long, default_value = "csv")]
        format: ExportFormat,
    },

    /// Print the query list fetched from the source repository
    Queries,

    /// Start web server to run extractions from the browser
    Serve {
        /// Address to bind to: PORT, HOST, or HOST:PORT (default: 127.0.0.1:3030)
        #[arg(default_value = "127.0.0.1:3030")]
        bind: String,
    },
}

/// Run the CLI.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { output, format } => cmd_run(&settings, output.as_deref(), format).await,
        Commands::Queries => cmd_queries(&settings).await,
        Commands::Serve { bind } => cmd_serve(&settings, &bind).await,
    }
}

/// One-shot pipeline: fetch queries, extract, export.
async fn cmd_run(
    settings: &Settings,
    output: Option<&Path>,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let client = SerpClient::new(settings.serp_config()?);

    let source = QuerySource::new(&settings.query_repo, &settings.query_file);
    println!(
        "{} Fetching {} from {}...",
        style("→").cyan(),
        settings.query_file,
        settings.query_repo
    );
    let queries = source.fetch_queries().await?;
    println!(
        "  {} {} queries loaded",
        style("✓").green(),
        queries.len()
    );

    let pb = ProgressBar::new(queries.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {wide_msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );

    let table = aggregate(&queries, &client, |_, query| {
        pb.set_message(query.to_string());
        pb.inc(1);
    })
    .await;
    pb.finish_and_clear();

    println!(
        "  {} {} rows ({} queries)",
        style("✓").green(),
        table.len(),
        table.distinct_queries().len()
    );

    let bytes = match format {
        ExportFormat::Csv => export::to_csv(&table),
        ExportFormat::Json => export::to_json(&table),
    };

    match output {
        Some(path) => {
            std::fs::write(path, &bytes)?;
            println!("{} Wrote {}", style("→").cyan(), path.display());
        }
        None => {
            std::io::stdout().write_all(&bytes)?;
        }
    }

    Ok(())
}

/// Print the query list without issuing any search.
async fn cmd_queries(settings: &Settings) -> anyhow::Result<()> {
    let source = QuerySource::new(&settings.query_repo, &settings.query_file);
    let queries = source.fetch_queries().await?;

    for query in &queries {
        println!("{}", query);
    }
    eprintln!(
        "  {} {} queries in {}/{}",
        style("✓").green(),
        queries.len(),
        settings.query_repo,
        settings.query_file
    );

    Ok(())
}

/// Start the web server.
async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    println!(
        "{} Starting paaserp server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 127.0.0.1:3030
/// - Just a host: "0.0.0.0" -> 0.0.0.0:3030
/// - Host and port: "0.0.0.0:3030" -> 0.0.0.0:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    // Try parsing as just a port number
    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("127.0.0.1".to_string(), port));
    }

    // Try parsing as host:port
    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
    }

    // Must be just a host, use default port
    Ok((bind.to_string(), 3030))
}
