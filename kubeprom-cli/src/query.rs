use anyhow::Result;
use clap::Args;
use kubeprom_cadvisor::CadvisorClient;
use kubeprom_client::{QueryApi, QueryData, QueryOptions, RangeOptions};
use tracing::info;

use crate::args::{ConnectionArgs, TargetArgs};
use crate::output::render_query;

#[derive(Debug, Args)]
pub struct Query {
    /// Metric expression: `metric`, `sum(metric)` or `rate(metric[5m])`
    pub query: String,

    /// Evaluation timestamp, RFC3339 or unix seconds
    #[arg(long)]
    pub time: Option<String>,

    /// Server-side evaluation timeout, e.g. 30s
    #[arg(long)]
    pub timeout: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub conn: ConnectionArgs,
}

#[derive(Debug, Args)]
pub struct Range {
    /// Metric expression: `metric`, `sum(metric)` or `rate(metric[5m])`
    pub query: String,

    /// Range start, RFC3339 or unix seconds
    #[arg(long)]
    pub start: String,

    /// Range end, RFC3339 or unix seconds
    #[arg(long)]
    pub end: String,

    /// Resolution step, e.g. 15s
    #[arg(long, default_value = "60s")]
    pub step: String,

    /// Server-side evaluation timeout, e.g. 30s
    #[arg(long)]
    pub timeout: Option<String>,

    #[command(flatten)]
    pub target: TargetArgs,

    #[command(flatten)]
    pub conn: ConnectionArgs,
}

fn scoped_client(target: &TargetArgs, conn: &ConnectionArgs) -> Result<CadvisorClient> {
    let file = conn.load_config()?;
    let target = target.resolve(file.target.as_ref())?;
    let config = conn.client_config(&file);
    info!(url = %config.url, scope = %target, "querying prometheus");
    Ok(CadvisorClient::from_config(config, target)?)
}

fn print_result(conn: &ConnectionArgs, query: &str, data: &QueryData) -> Result<()> {
    if conn.json_output() {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        print!("{}", render_query(query, data));
    }
    Ok(())
}

pub async fn handle_query(cmd: Query) -> Result<()> {
    let client = scoped_client(&cmd.target, &cmd.conn)?;
    let options = QueryOptions {
        query: cmd.query,
        time: cmd.time,
        timeout: cmd.timeout,
    };
    let sent = client.rewrite(&options.query);
    let data = client.query(options).await?;
    print_result(&cmd.conn, &sent, &data)
}

pub async fn handle_range(cmd: Range) -> Result<()> {
    let client = scoped_client(&cmd.target, &cmd.conn)?;
    let mut options = RangeOptions::new(cmd.query, cmd.start, cmd.end, cmd.step);
    options.timeout = cmd.timeout;
    let sent = client.rewrite(&options.query);
    let data = client.query_range(options).await?;
    print_result(&cmd.conn, &sent, &data)
}
