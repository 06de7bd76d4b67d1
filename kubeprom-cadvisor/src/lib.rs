//! Kubeprom-Cadvisor
//!
//! Prometheus queries scoped to Kubernetes cAdvisor targets. A
//! [`CadvisorClient`] wraps any [`kubeprom_client::QueryApi`] and adds the
//! node, pod or container label selector to every query it forwards.
//!
//! ```no_run
//! use kubeprom_cadvisor::CadvisorClient;
//! use kubeprom_client::{ClientConfig, QueryApi, QueryOptions};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CadvisorClient::pod(ClientConfig::default(), "web-0")?;
//! // sent as sum(container_memory_usage_bytes{job="kubernetes-cadvisor",...,pod_name="web-0",container_name="POD"})
//! let data = client
//!     .query(QueryOptions::new("sum(container_memory_usage_bytes)"))
//!     .await?;
//! # let _ = data;
//! # Ok(())
//! # }
//! ```

mod client;
pub use client::CadvisorClient;

pub mod errors;

mod labels;
pub use labels::{
    CadvisorTarget, CADVISOR_JOB, DEFAULT_NAMESPACE, DEFAULT_REGION, DEFAULT_ZONE,
    POD_CONTAINER_NAME,
};

mod query;
pub use query::update_query;
