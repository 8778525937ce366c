use thiserror::Error;

use crate::validation::MetricsError;

/// Top-level error for the binary and its handlers.
///
/// Errors inside the validation path never surface here; they are logged
/// where they happen.
#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Kubernetes client error: {0}")]
    Kube(#[from] kube::Error),

    #[error("Failed to infer Kubernetes config: {0}")]
    InferConfig(#[from] kube::config::InferConfigError),

    #[error("Failed to read kubeconfig: {0}")]
    Kubeconfig(#[from] kube::config::KubeconfigError),

    #[error("Metrics error: {0}")]
    Metrics(#[from] MetricsError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ParsingFailed(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
