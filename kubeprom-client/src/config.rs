use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::errors::{ClientError, Result};

pub const DEFAULT_URL: &str = "http://localhost:9090";
/// Overrides `DEFAULT_URL` when set and non-empty
pub const URL_ENV: &str = "KUBEPROM_URL";
pub const DEFAULT_PATH: &str = "/api/v1/";

/// Connection settings for a Prometheus server.
///
/// Every field has a default, so a YAML section only needs the keys it changes.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the server, e.g. `http://prometheus.monitoring:9090`
    pub url: String,
    /// API prefix joined onto `url`
    pub path: String,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// TCP connect timeout
    pub connect_timeout_ms: u64,
    /// Extra headers sent with every request
    pub headers: BTreeMap<String, String>,
    pub credentials: Option<Credentials>,
    /// Extra root certificate (PEM) to trust
    pub ca_cert: Option<PathBuf>,
    pub insecure_skip_verify: bool,
}

/// `KUBEPROM_URL` if set, otherwise `DEFAULT_URL`.
///
/// Only fills in a missing url: an explicit `url` in a config file or a
/// builder call still wins.
fn default_url() -> String {
    std::env::var(URL_ENV)
        .ok()
        .filter(|url| !url.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_URL.to_string())
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            path: DEFAULT_PATH.to_string(),
            timeout_ms: 5000,
            connect_timeout_ms: 2000,
            headers: BTreeMap::new(),
            credentials: None,
            ca_cert: None,
            insecure_skip_verify: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Credentials {
    Basic { username: String, password: String },
    Bearer { token: String },
}

impl ClientConfig {
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Checks the settings before a client is built from them.
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(ClientError::Config("url must not be empty".to_string()));
        }
        let parsed = url::Url::parse(&self.url)?;
        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClientError::Config(format!(
                    "unsupported url scheme '{}', expected http or https",
                    other
                )))
            }
        }
        if self.timeout_ms == 0 {
            return Err(ClientError::Config("timeout_ms must be positive".to_string()));
        }
        Ok(())
    }

    /// The API root: `url` with `path` appended and a trailing slash guaranteed,
    /// so that commands like `query` resolve beneath it.
    pub fn api_root(&self) -> Result<url::Url> {
        let base = url::Url::parse(&self.url)?;
        let mut path = self.path.trim().to_string();
        if !path.starts_with('/') {
            path.insert(0, '/');
        }
        if !path.ends_with('/') {
            path.push('/');
        }
        let base_path = base.path().trim_end_matches('/');
        let mut root = base.clone();
        root.set_path(&format!("{}{}", base_path, path));
        Ok(root)
    }
}
