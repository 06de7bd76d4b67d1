use serde::Deserialize;
use std::fmt;

use crate::errors::{CadvisorError, Result};

/// Scrape job cAdvisor metrics are collected under
pub const CADVISOR_JOB: &str = "kubernetes-cadvisor";
pub const DEFAULT_REGION: &str = "infra";
pub const DEFAULT_ZONE: &str = "default";
pub const DEFAULT_NAMESPACE: &str = "default";
/// cAdvisor reports pod-level usage under the pause container
pub const POD_CONTAINER_NAME: &str = "POD";

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

fn default_zone() -> String {
    DEFAULT_ZONE.to_string()
}

fn default_namespace() -> String {
    DEFAULT_NAMESPACE.to_string()
}

/// The node, pod or container a query is scoped to.
///
/// Deserializes from a tagged form, e.g.
///
/// ```yaml
/// kind: container
/// container_name: nginx
/// pod_name: web-0
/// namespace: shop
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum CadvisorTarget {
    Node {
        instance: String,
        #[serde(default = "default_region")]
        region: String,
        #[serde(default = "default_zone")]
        zone: String,
    },
    Pod {
        pod_name: String,
        #[serde(default = "default_namespace")]
        namespace: String,
        #[serde(default = "default_region")]
        region: String,
        #[serde(default = "default_zone")]
        zone: String,
    },
    Container {
        container_name: String,
        pod_name: String,
        #[serde(default = "default_namespace")]
        namespace: String,
        #[serde(default = "default_region")]
        region: String,
    },
}

impl CadvisorTarget {
    /// A node, in region `infra` and zone `default`.
    pub fn node(instance: impl Into<String>) -> Self {
        CadvisorTarget::Node {
            instance: instance.into(),
            region: default_region(),
            zone: default_zone(),
        }
    }

    /// A pod, in namespace `default`, region `infra` and zone `default`.
    pub fn pod(pod_name: impl Into<String>) -> Self {
        CadvisorTarget::Pod {
            pod_name: pod_name.into(),
            namespace: default_namespace(),
            region: default_region(),
            zone: default_zone(),
        }
    }

    /// A container of a pod, in namespace `default` and region `infra`.
    pub fn container(container_name: impl Into<String>, pod_name: impl Into<String>) -> Self {
        CadvisorTarget::Container {
            container_name: container_name.into(),
            pod_name: pod_name.into(),
            namespace: default_namespace(),
            region: default_region(),
        }
    }

    pub fn with_region(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            CadvisorTarget::Node { region, .. }
            | CadvisorTarget::Pod { region, .. }
            | CadvisorTarget::Container { region, .. } => *region = value.into(),
        }
        self
    }

    /// Containers carry no zone label; this is a no-op for them.
    pub fn with_zone(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            CadvisorTarget::Node { zone, .. } | CadvisorTarget::Pod { zone, .. } => {
                *zone = value.into()
            }
            CadvisorTarget::Container { .. } => {}
        }
        self
    }

    /// Nodes are not namespaced; this is a no-op for them.
    pub fn with_namespace(mut self, value: impl Into<String>) -> Self {
        match &mut self {
            CadvisorTarget::Pod { namespace, .. } | CadvisorTarget::Container { namespace, .. } => {
                *namespace = value.into()
            }
            CadvisorTarget::Node { .. } => {}
        }
        self
    }

    pub fn kind(&self) -> &'static str {
        match self {
            CadvisorTarget::Node { .. } => "node",
            CadvisorTarget::Pod { .. } => "pod",
            CadvisorTarget::Container { .. } => "container",
        }
    }

    /// Label pairs in selector order.
    pub fn labels(&self) -> Vec<(&'static str, &str)> {
        match self {
            CadvisorTarget::Node {
                instance,
                region,
                zone,
            } => vec![
                ("job", CADVISOR_JOB),
                ("region", region.as_str()),
                ("zone", zone.as_str()),
                ("instance", instance.as_str()),
            ],
            CadvisorTarget::Pod {
                pod_name,
                namespace,
                region,
                zone,
            } => vec![
                ("job", CADVISOR_JOB),
                ("region", region.as_str()),
                ("zone", zone.as_str()),
                ("namespace", namespace.as_str()),
                ("pod_name", pod_name.as_str()),
                ("container_name", POD_CONTAINER_NAME),
            ],
            CadvisorTarget::Container {
                container_name,
                pod_name,
                namespace,
                region,
            } => vec![
                ("job", CADVISOR_JOB),
                ("region", region.as_str()),
                ("namespace", namespace.as_str()),
                ("pod_name", pod_name.as_str()),
                ("container_name", container_name.as_str()),
            ],
        }
    }

    /// Selector body without braces, e.g.
    /// `job="kubernetes-cadvisor",region="infra",zone="default",instance="node-1"`.
    pub fn selector(&self) -> String {
        self.labels()
            .iter()
            .map(|(name, value)| format!("{}=\"{}\"", name, escape_label_value(value)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Rejects targets with an empty identifying field.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.labels() {
            if value.trim().is_empty() {
                return Err(CadvisorError::InvalidTarget(format!(
                    "{} target requires a non-empty {}",
                    self.kind(),
                    name
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CadvisorTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CadvisorTarget::Node { instance, .. } => write!(f, "node {}", instance),
            CadvisorTarget::Pod {
                pod_name,
                namespace,
                ..
            } => write!(f, "pod {}/{}", namespace, pod_name),
            CadvisorTarget::Container {
                container_name,
                pod_name,
                namespace,
                ..
            } => write!(f, "container {}/{}/{}", namespace, pod_name, container_name),
        }
    }
}

/// Escapes a value for a double-quoted PromQL string.
fn escape_label_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            c => out.push(c),
        }
    }
    out
}
