use async_trait::async_trait;

use crate::errors::Result;
use crate::types::{QueryData, TargetsData};

/// Parameters of an instant query (`/query`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryOptions {
    pub query: String,
    /// Evaluation timestamp, RFC3339 or unix seconds. Server time when unset.
    pub time: Option<String>,
    /// Evaluation timeout, e.g. `30s`
    pub timeout: Option<String>,
}

impl QueryOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("query", self.query.clone())];
        if let Some(time) = &self.time {
            params.push(("time", time.clone()));
        }
        if let Some(timeout) = &self.timeout {
            params.push(("timeout", timeout.clone()));
        }
        params
    }
}

/// Parameters of a range query (`/query_range`).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RangeOptions {
    pub query: String,
    pub start: String,
    pub end: String,
    /// Resolution step, a duration such as `15s` or float seconds
    pub step: String,
    pub timeout: Option<String>,
}

impl RangeOptions {
    pub fn new(
        query: impl Into<String>,
        start: impl Into<String>,
        end: impl Into<String>,
        step: impl Into<String>,
    ) -> Self {
        Self {
            query: query.into(),
            start: start.into(),
            end: end.into(),
            step: step.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: impl Into<String>) -> Self {
        self.timeout = Some(timeout.into());
        self
    }

    pub(crate) fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("query", self.query.clone()),
            ("start", self.start.clone()),
            ("end", self.end.clone()),
            ("step", self.step.clone()),
        ];
        if let Some(timeout) = &self.timeout {
            params.push(("timeout", timeout.clone()));
        }
        params
    }
}

/// The query surface of a Prometheus server.
///
/// `PrometheusClient` talks HTTP; decorators implement it as well and forward
/// to an inner client after adjusting the request.
#[async_trait]
pub trait QueryApi: Send + Sync {
    /// Evaluates an instant query.
    async fn query(&self, options: QueryOptions) -> Result<QueryData>;

    /// Evaluates an expression over a range of time.
    async fn query_range(&self, options: RangeOptions) -> Result<QueryData>;

    /// Lists the values a label takes.
    async fn label_values(&self, label: &str) -> Result<Vec<String>>;

    /// Lists the scrape targets known to the server.
    async fn targets(&self) -> Result<TargetsData>;
}
