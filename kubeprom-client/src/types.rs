//! Response model of the Prometheus HTTP API

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label set of a series
pub type Metric = BTreeMap<String, String>;

/// `(unix timestamp in seconds, value)`. Prometheus sends values as strings
/// so that `NaN` and `+Inf` survive JSON.
pub type SamplePoint = (f64, String);

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

/// The envelope every API response is wrapped in.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: Status,
    pub data: Option<T>,
    pub error_type: Option<String>,
    pub error: Option<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

/// Result of an instant or range query
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "resultType", content = "result", rename_all = "lowercase")]
pub enum QueryData {
    Vector(Vec<InstantSample>),
    Matrix(Vec<RangeSeries>),
    Scalar(SamplePoint),
    String(SamplePoint),
}

impl QueryData {
    pub fn result_type(&self) -> &'static str {
        match self {
            QueryData::Vector(_) => "vector",
            QueryData::Matrix(_) => "matrix",
            QueryData::Scalar(_) => "scalar",
            QueryData::String(_) => "string",
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            QueryData::Vector(v) => v.is_empty(),
            QueryData::Matrix(m) => m.is_empty(),
            QueryData::Scalar(_) | QueryData::String(_) => false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct InstantSample {
    #[serde(default)]
    pub metric: Metric,
    pub value: SamplePoint,
}

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct RangeSeries {
    #[serde(default)]
    pub metric: Metric,
    #[serde(default)]
    pub values: Vec<SamplePoint>,
}

/// Payload of `/targets`
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TargetsData {
    #[serde(default)]
    pub active_targets: Vec<ActiveTarget>,
    #[serde(default)]
    pub dropped_targets: Vec<DroppedTarget>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ActiveTarget {
    pub discovered_labels: Metric,
    pub labels: Metric,
    pub scrape_pool: String,
    pub scrape_url: String,
    pub global_url: String,
    pub last_error: String,
    pub last_scrape: String,
    pub last_scrape_duration: f64,
    pub health: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DroppedTarget {
    pub discovered_labels: Metric,
}
