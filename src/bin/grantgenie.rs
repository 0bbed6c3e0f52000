//! CLI binary for grantgenie.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use grant_catalog::{GrantCatalog, SearchFilters};
use grantgenie::{AppConfig, CatalogServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// grantgenie: searchable catalog of public grant and subsidy programs.
#[derive(Parser)]
#[command(name = "grantgenie", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, env = "GRANTGENIE_CONFIG")]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Option<Command>,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Serve the search API over HTTP.
    Serve {
        /// Override the configured port.
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Scrape the listing pages and write the snapshot file.
    Collect {
        /// Snapshot path (defaults to the configured one).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one search and print the results as JSON.
    Search {
        /// Free-text query.
        #[arg(default_value = "")]
        query: String,
        /// Maximum results.
        #[arg(short = 'n', long)]
        count: Option<usize>,
        /// Industry filter.
        #[arg(long)]
        category: Option<String>,
        /// Target filter.
        #[arg(long)]
        target: Option<String>,
    },

    /// Rebuild the catalog from every source and print the report.
    Reload,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `search` and `reload` output stays pipeable.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("grantgenie=info,grant_catalog=info")),
        )
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => run_serve(config, port).await,
        Command::Collect { output } => run_collect(config, output).await,
        Command::Search {
            query,
            count,
            category,
            target,
        } => {
            let filters = SearchFilters { category, target };
            run_search(config, &query, count, filters).await
        }
        Command::Reload => run_reload(config).await,
    }
}

async fn run_serve(mut config: AppConfig, port: Option<u16>) -> anyhow::Result<()> {
    if let Some(port) = port {
        config.server.port = port;
    }

    let catalog = Arc::new(GrantCatalog::from_config(&config.catalog)?);
    let warm = catalog.refresh(false).await;
    info!(size = warm.size, "catalog warmed");

    let mut server = CatalogServer::start(Arc::clone(&catalog), &config.server).await?;
    println!("grantgenie v{} on http://{}", env!("CARGO_PKG_VERSION"), server.addr());

    tokio::select! {
        result = server.wait() => result?,
        _ = tokio::signal::ctrl_c() => info!("shutting down"),
    }
    server.shutdown();
    Ok(())
}

async fn run_collect(config: AppConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let path = output.unwrap_or_else(|| config.catalog.snapshot.path.clone());
    let report = grant_catalog::collect(&config.catalog, &path).await?;
    if report.written {
        println!("wrote {} programs to {}", report.rows, path.display());
    } else {
        println!("no programs found; {} left unchanged", path.display());
    }
    Ok(())
}

async fn run_search(
    config: AppConfig,
    query: &str,
    count: Option<usize>,
    filters: SearchFilters,
) -> anyhow::Result<()> {
    let catalog = GrantCatalog::from_config(&config.catalog)?;
    let limit = count.unwrap_or(config.server.default_count);
    let outcome = catalog.search(query, &filters, limit).await;
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}

async fn run_reload(config: AppConfig) -> anyhow::Result<()> {
    let catalog = GrantCatalog::from_config(&config.catalog)?;
    let report = catalog.refresh(true).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
