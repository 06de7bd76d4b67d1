use async_trait::async_trait;
use kubeprom_client::{
    errors::Result as ClientResult, ClientConfig, PrometheusClient, QueryApi, QueryData,
    QueryOptions, RangeOptions, TargetsData,
};
use tracing::debug;

use crate::{errors::Result, labels::CadvisorTarget, query::update_query};

/// A Prometheus client whose queries are scoped to one cAdvisor target.
///
/// `query` and `query_range` splice the target's label selector into the
/// expression before forwarding to the inner client. Other calls pass through
/// untouched.
#[derive(Debug, Clone)]
pub struct CadvisorClient<C = PrometheusClient> {
    inner: C,
    target: CadvisorTarget,
    selector: String,
}

impl CadvisorClient<PrometheusClient> {
    /// Client for the metrics of a node, with the default region and zone.
    pub fn node(config: ClientConfig, instance: impl Into<String>) -> Result<Self> {
        Self::from_config(config, CadvisorTarget::node(instance))
    }

    /// Client for the metrics of a pod, with the default namespace, region and zone.
    pub fn pod(config: ClientConfig, pod_name: impl Into<String>) -> Result<Self> {
        Self::from_config(config, CadvisorTarget::pod(pod_name))
    }

    /// Client for the metrics of a container, with the default namespace and region.
    pub fn container(
        config: ClientConfig,
        container_name: impl Into<String>,
        pod_name: impl Into<String>,
    ) -> Result<Self> {
        Self::from_config(config, CadvisorTarget::container(container_name, pod_name))
    }

    /// Builds the HTTP client from `config` and scopes it to `target`.
    pub fn from_config(config: ClientConfig, target: CadvisorTarget) -> Result<Self> {
        let inner = PrometheusClient::new(config)?;
        Self::wrap(inner, target)
    }
}

impl<C: QueryApi> CadvisorClient<C> {
    /// Scopes an existing client to `target`.
    pub fn wrap(inner: C, target: CadvisorTarget) -> Result<Self> {
        target.validate()?;
        let selector = target.selector();
        Ok(Self {
            inner,
            target,
            selector,
        })
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn target(&self) -> &CadvisorTarget {
        &self.target
    }

    /// The rendered selector body spliced into every query.
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// The query as it will be sent.
    pub fn rewrite(&self, query: &str) -> String {
        update_query(query, &self.selector)
    }
}

#[async_trait]
impl<C: QueryApi> QueryApi for CadvisorClient<C> {
    async fn query(&self, mut options: QueryOptions) -> ClientResult<QueryData> {
        options.query = self.rewrite(&options.query);
        debug!(scope = %self.target, query = %options.query, "scoped instant query");
        self.inner.query(options).await
    }

    async fn query_range(&self, mut options: RangeOptions) -> ClientResult<QueryData> {
        options.query = self.rewrite(&options.query);
        debug!(scope = %self.target, query = %options.query, "scoped range query");
        self.inner.query_range(options).await
    }

    async fn label_values(&self, label: &str) -> ClientResult<Vec<String>> {
        self.inner.label_values(label).await
    }

    async fn targets(&self) -> ClientResult<TargetsData> {
        self.inner.targets().await
    }
}
