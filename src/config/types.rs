use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::ConfigError;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub sweep: SweepConfig,
    pub metrics: MetricsConfig,
    pub cluster: ClusterConfig,
}

/// Sweep cadence and scope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    /// Seconds between full sweeps
    pub interval_secs: u64,
    /// Upper bound on a single list call
    pub list_timeout_secs: u64,
    /// Restrict listing and watching to one namespace
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            list_timeout_secs: 30,
            namespace: None,
        }
    }
}

impl SweepConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn list_timeout(&self) -> Duration {
        Duration::from_secs(self.list_timeout_secs)
    }
}

/// Metrics endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub host: String,
    pub port: u16,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl MetricsConfig {
    pub fn addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue(format!("metrics address: {}", e)))
    }
}

/// Cluster connection configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Kubeconfig context; the current context is used when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Config {
    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.interval_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "sweep.interval_secs must be greater than zero".to_string(),
            ));
        }
        if self.sweep.list_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "sweep.list_timeout_secs must be greater than zero".to_string(),
            ));
        }
        self.metrics.addr()?;
        Ok(())
    }
}
