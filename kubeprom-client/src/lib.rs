//! Kubeprom-Client
//!
//! Kubeprom-Client -- a client for the Prometheus HTTP query API

mod api;
pub use api::{QueryApi, QueryOptions, RangeOptions};

mod client;
pub use client::{PrometheusClient, PrometheusClientBuilder};

pub mod config;
pub use config::{ClientConfig, Credentials};

pub mod errors;

pub mod types;
pub use types::{QueryData, TargetsData};
