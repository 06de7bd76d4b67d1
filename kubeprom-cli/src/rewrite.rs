use anyhow::Result;
use clap::Args;
use kubeprom_cadvisor::update_query;

use crate::args::TargetArgs;
use crate::config::CliConfig;

#[derive(Debug, Args)]
pub struct Rewrite {
    /// Metric expression to scope
    pub query: String,

    #[command(flatten)]
    pub target: TargetArgs,

    /// Path to a kubeprom.yaml config file
    #[arg(long, env = "KUBEPROM_CONFIG")]
    pub config: Option<std::path::PathBuf>,
}

/// Prints the query as it would be sent. Does not contact Prometheus.
pub fn handle(cmd: Rewrite) -> Result<()> {
    let file = match &cmd.config {
        Some(path) => CliConfig::from_file(path)?,
        None => CliConfig::default(),
    };
    let target = cmd.target.resolve(file.target.as_ref())?;
    println!("{}", update_query(&cmd.query, &target.selector()));
    Ok(())
}
