use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{
    api::{QueryApi, QueryOptions, RangeOptions},
    config::{ClientConfig, Credentials},
    errors::{ClientError, Result},
    types::{ApiResponse, QueryData, Status, TargetsData},
};

/// HTTP client for the Prometheus query API.
///
/// Each call returns only the `data` payload of the response envelope. A
/// server-side failure (`"status": "error"`) is turned into `ClientError::Api`.
#[derive(Debug, Clone)]
pub struct PrometheusClient {
    root: url::Url,
    http: reqwest::Client,
    credentials: Option<Credentials>,
}

impl PrometheusClient {
    /// Initializes a new `PrometheusClientBuilder` with default settings.
    pub fn builder() -> PrometheusClientBuilder {
        PrometheusClientBuilder::default()
    }

    /// Builds a client from a complete configuration.
    pub fn new(cfg: ClientConfig) -> Result<Self> {
        cfg.validate()?;
        let root = cfg.api_root()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &cfg.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|e| ClientError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            let header_value =
                HeaderValue::from_str(value).map_err(|e| ClientError::InvalidHeader {
                    name: name.clone(),
                    reason: e.to_string(),
                })?;
            headers.insert(header_name, header_value);
        }

        let mut http = reqwest::Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .connect_timeout(Duration::from_millis(cfg.connect_timeout_ms))
            .default_headers(headers);

        if let Some(ca_path) = &cfg.ca_cert {
            let pem = std::fs::read(ca_path)?;
            http = http.add_root_certificate(reqwest::Certificate::from_pem(&pem)?);
        }
        if cfg.insecure_skip_verify {
            warn!("TLS certificate verification is disabled");
            http = http.danger_accept_invalid_certs(true);
        }

        Ok(Self {
            root,
            http: http.build()?,
            credentials: cfg.credentials,
        })
    }

    /// The resolved API root, e.g. `http://localhost:9090/api/v1/`.
    pub fn api_root(&self) -> &url::Url {
        &self.root
    }

    /// Runs a raw API command (`query`, `label/job/values`, ...) and returns
    /// the decoded `data` payload.
    pub async fn get(
        &self,
        command: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let url = self.root.join(command.trim_start_matches('/'))?;
        self.send(url, params).await
    }

    async fn send(&self, url: url::Url, params: &[(&str, String)]) -> Result<serde_json::Value> {
        debug!(url = %url, "prometheus request");

        let mut request = self.http.get(url).query(params);
        request = match &self.credentials {
            Some(Credentials::Basic { username, password }) => {
                request.basic_auth(username, Some(password))
            }
            Some(Credentials::Bearer { token }) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_envelope(status, &body)
    }

    async fn get_typed<T: DeserializeOwned>(
        &self,
        command: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let data = self.get(command, params).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// `label/<name>/values` with the name pushed as one percent-encoded path
    /// segment, so `/`, `?` or `#` in it cannot reach another endpoint.
    fn label_values_url(&self, label: &str) -> Result<url::Url> {
        if matches!(label, "" | "." | "..") {
            return Err(ClientError::Config(format!(
                "invalid label name '{}'",
                label
            )));
        }
        let mut url = self.root.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::Config(format!("cannot extend api root {}", self.root)))?
            .pop_if_empty()
            .extend(["label", label, "values"]);
        Ok(url)
    }
}

#[async_trait]
impl QueryApi for PrometheusClient {
    async fn query(&self, options: QueryOptions) -> Result<QueryData> {
        self.get_typed("query", &options.params()).await
    }

    async fn query_range(&self, options: RangeOptions) -> Result<QueryData> {
        self.get_typed("query_range", &options.params()).await
    }

    async fn label_values(&self, label: &str) -> Result<Vec<String>> {
        let url = self.label_values_url(label)?;
        let data = self.send(url, &[]).await?;
        Ok(serde_json::from_value(data)?)
    }

    async fn targets(&self) -> Result<TargetsData> {
        self.get_typed("targets", &[]).await
    }
}

/// Unwraps the API envelope.
///
/// An error envelope wins over the HTTP status, since Prometheus answers bad
/// queries with 400/422 and a JSON body describing the failure.
fn decode_envelope(status: StatusCode, body: &str) -> Result<serde_json::Value> {
    let envelope: ApiResponse<serde_json::Value> = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(e) if status.is_success() => return Err(ClientError::Decode(e)),
        Err(_) => {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: body.chars().take(512).collect(),
            })
        }
    };

    for warning in &envelope.warnings {
        warn!(warning = %warning, "prometheus returned a warning");
    }

    match envelope.status {
        Status::Error => Err(ClientError::Api {
            error_type: envelope.error_type.unwrap_or_else(|| "unknown".to_string()),
            message: envelope.error.unwrap_or_default(),
        }),
        Status::Success => envelope.data.ok_or(ClientError::MissingData),
    }
}

/// A builder for configuring and creating a `PrometheusClient`.
///
/// Starts from `ClientConfig::default()`; each setter overrides one field.
#[derive(Debug, Clone, Default)]
pub struct PrometheusClientBuilder {
    config: ClientConfig,
}

impl PrometheusClientBuilder {
    /// Starts from an existing configuration, e.g. one loaded from a file.
    pub fn from_config(config: ClientConfig) -> Self {
        Self { config }
    }

    /// Sets the base URL of the Prometheus server.
    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.config.url = url.into();
        self
    }

    /// Sets the API prefix, `/api/v1/` by default.
    pub fn api_path(mut self, path: impl Into<String>) -> Self {
        self.config.path = path.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout_ms = timeout.as_millis() as u64;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(name.into(), value.into());
        self
    }

    pub fn with_basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::Basic {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.config.credentials = Some(Credentials::Bearer {
            token: token.into(),
        });
        self
    }

    /// Trusts an extra root certificate (PEM) in addition to the system roots.
    pub fn with_ca_cert(mut self, ca_cert: impl AsRef<Path>) -> Self {
        self.config.ca_cert = Some(ca_cert.as_ref().to_path_buf());
        self
    }

    pub fn insecure_skip_verify(mut self, skip: bool) -> Self {
        self.config.insecure_skip_verify = skip;
        self
    }

    pub fn build(self) -> Result<PrometheusClient> {
        PrometheusClient::new(self.config)
    }
}
