mod args;
mod config;
mod metadata;
mod output;
mod query;
mod rewrite;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "kubeprom")]
#[command(about = "Query cAdvisor metrics of Kubernetes nodes, pods and containers through Prometheus", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(
        about = "Print a query scoped to a target, without running it",
        after_help = "Examples:
  kubeprom rewrite --node node-1 'sum(container_memory_usage_bytes)'
  kubeprom rewrite --pod web-0 --container nginx --namespace shop 'rate(container_cpu_usage_seconds_total[5m])'"
    )]
    Rewrite(rewrite::Rewrite),

    #[command(
        about = "Run an instant query scoped to a target",
        after_help = "Examples:
  kubeprom query --node node-1 container_memory_usage_bytes
  kubeprom query --pod web-0 --namespace shop 'sum(container_memory_usage_bytes)' --output json

Env:
  KUBEPROM_URL, used when neither --url nor the config file sets a url (default http://localhost:9090)"
    )]
    Query(query::Query),

    #[command(
        about = "Run a range query scoped to a target",
        after_help = "Examples:
  kubeprom range --pod web-0 --container nginx 'rate(container_cpu_usage_seconds_total[5m])' --start 2024-01-01T00:00:00Z --end 2024-01-01T01:00:00Z --step 30s

Env:
  KUBEPROM_URL, used when neither --url nor the config file sets a url (default http://localhost:9090)"
    )]
    Range(query::Range),

    #[command(about = "List the values of a label")]
    Labels(metadata::Labels),

    #[command(about = "List the scrape targets known to Prometheus")]
    Targets(metadata::Targets),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, results to stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Rewrite(cmd) => rewrite::handle(cmd),
        Commands::Query(cmd) => query::handle_query(cmd).await,
        Commands::Range(cmd) => query::handle_range(cmd).await,
        Commands::Labels(cmd) => metadata::handle_labels(cmd).await,
        Commands::Targets(cmd) => metadata::handle_targets(cmd).await,
    }
}
