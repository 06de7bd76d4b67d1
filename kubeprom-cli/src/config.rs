//! `kubeprom.yaml` parsing

use kubeprom_cadvisor::CadvisorTarget;
use kubeprom_client::ClientConfig;
use serde::Deserialize;
use std::path::Path;

/// Contents of the config file passed with `--config`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    /// Prometheus connection settings
    #[serde(default)]
    pub prometheus: ClientConfig,

    /// Default target when no target flag is given
    pub target: Option<CadvisorTarget>,
}

impl CliConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file {:?}: {}", path, e))?;

        let config: CliConfig = serde_yaml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file {:?}: {}", path, e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        self.prometheus
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid prometheus section: {}", e))?;
        if let Some(target) = &self.target {
            target
                .validate()
                .map_err(|e| anyhow::anyhow!("Invalid target section: {}", e))?;
        }
        Ok(())
    }
}
