use anyhow::Result;
use clap::Args;
use kubeprom_cadvisor::CadvisorTarget;
use kubeprom_client::{ClientConfig, Credentials};
use std::path::PathBuf;

use crate::config::CliConfig;

/// Where to reach Prometheus. Flags win over the config file, which wins over
/// `KUBEPROM_URL`.
#[derive(Debug, Args, Clone, Default)]
pub struct ConnectionArgs {
    /// Prometheus base URL [default: $KUBEPROM_URL, then http://localhost:9090]
    #[arg(long)]
    pub url: Option<String>,

    /// Path to a kubeprom.yaml config file
    #[arg(long, env = "KUBEPROM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Request timeout in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Bearer token sent with every request
    #[arg(long, env = "KUBEPROM_TOKEN", conflicts_with = "username")]
    pub bearer_token: Option<String>,

    /// Basic auth username
    #[arg(long, requires = "password")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, requires = "username")]
    pub password: Option<String>,

    /// Extra root certificate (PEM) to trust
    #[arg(long)]
    pub ca_cert: Option<PathBuf>,

    /// Skip TLS certificate verification
    #[arg(long, default_value_t = false)]
    pub insecure: bool,

    #[arg(long, value_parser = ["text", "json"], default_value = "text", help = "Output format")]
    pub output: String,
}

impl ConnectionArgs {
    pub fn load_config(&self) -> Result<CliConfig> {
        match &self.config {
            Some(path) => CliConfig::from_file(path),
            None => Ok(CliConfig::default()),
        }
    }

    /// Merges the flags over the `prometheus` section of the config file.
    pub fn client_config(&self, file: &CliConfig) -> ClientConfig {
        let mut cfg = file.prometheus.clone();
        if let Some(url) = &self.url {
            cfg.url = url.clone();
        }
        if let Some(timeout_ms) = self.timeout_ms {
            cfg.timeout_ms = timeout_ms;
        }
        if let Some(token) = &self.bearer_token {
            cfg.credentials = Some(Credentials::Bearer {
                token: token.clone(),
            });
        }
        if let (Some(username), Some(password)) = (&self.username, &self.password) {
            cfg.credentials = Some(Credentials::Basic {
                username: username.clone(),
                password: password.clone(),
            });
        }
        if let Some(ca_cert) = &self.ca_cert {
            cfg.ca_cert = Some(ca_cert.clone());
        }
        if self.insecure {
            cfg.insecure_skip_verify = true;
        }
        cfg
    }

    pub fn json_output(&self) -> bool {
        self.output == "json"
    }
}

/// Which node, pod or container to scope queries to.
#[derive(Debug, Args, Clone, Default)]
pub struct TargetArgs {
    /// Node instance, e.g. node-1
    #[arg(long, conflicts_with_all = ["pod", "container"])]
    pub node: Option<String>,

    /// Pod name
    #[arg(long)]
    pub pod: Option<String>,

    /// Container name; needs --pod
    #[arg(long, requires = "pod")]
    pub container: Option<String>,

    /// Kubernetes namespace (default: default)
    #[arg(long)]
    pub namespace: Option<String>,

    /// Region label (default: infra)
    #[arg(long)]
    pub region: Option<String>,

    /// Zone label (default: default)
    #[arg(long)]
    pub zone: Option<String>,
}

impl TargetArgs {
    /// Picks the target from the flags, falling back to the config file, then
    /// applies the region, zone and namespace overrides.
    pub fn resolve(&self, fallback: Option<&CadvisorTarget>) -> Result<CadvisorTarget> {
        let target = match (&self.node, &self.pod, &self.container) {
            (_, Some(pod), Some(container)) => CadvisorTarget::container(container, pod),
            (_, Some(pod), None) => CadvisorTarget::pod(pod),
            (Some(node), None, _) => CadvisorTarget::node(node),
            (None, None, Some(_)) => anyhow::bail!("--container requires --pod"),
            (None, None, None) => fallback.cloned().ok_or_else(|| {
                anyhow::anyhow!(
                    "no target selected: pass --node, --pod or --pod with --container, or set `target` in the config file"
                )
            })?,
        };

        let mut target = target;
        if let Some(namespace) = &self.namespace {
            target = target.with_namespace(namespace);
        }
        if let Some(region) = &self.region {
            target = target.with_region(region);
        }
        if let Some(zone) = &self.zone {
            target = target.with_zone(zone);
        }

        target.validate()?;
        Ok(target)
    }
}
