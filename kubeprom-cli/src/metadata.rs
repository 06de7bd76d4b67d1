use anyhow::Result;
use clap::Args;
use kubeprom_client::{PrometheusClient, QueryApi};

use crate::args::ConnectionArgs;
use crate::output::render_targets;

#[derive(Debug, Args)]
pub struct Labels {
    /// Label name, e.g. namespace
    pub name: String,

    #[command(flatten)]
    pub conn: ConnectionArgs,
}

#[derive(Debug, Args)]
pub struct Targets {
    #[command(flatten)]
    pub conn: ConnectionArgs,
}

fn client(conn: &ConnectionArgs) -> Result<PrometheusClient> {
    let file = conn.load_config()?;
    Ok(PrometheusClient::new(conn.client_config(&file))?)
}

pub async fn handle_labels(cmd: Labels) -> Result<()> {
    let values = client(&cmd.conn)?.label_values(&cmd.name).await?;
    if cmd.conn.json_output() {
        println!("{}", serde_json::to_string_pretty(&values)?);
    } else if values.is_empty() {
        println!("(no values)");
    } else {
        for v in values {
            println!("{}", v);
        }
    }
    Ok(())
}

pub async fn handle_targets(cmd: Targets) -> Result<()> {
    let targets = client(&cmd.conn)?.targets().await?;
    if cmd.conn.json_output() {
        println!("{}", serde_json::to_string_pretty(&targets)?);
    } else {
        print!("{}", render_targets(&targets));
    }
    Ok(())
}
