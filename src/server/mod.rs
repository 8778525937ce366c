//! Metrics endpoint.
//!
//! Serves the compliance gauges to Prometheus while the engine runs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use workload_compliance::server::{MetricsServer, MetricsServerConfig};
//!
//! let config = MetricsServerConfig::default().port(9100);
//! let server = MetricsServer::new(config, metrics.clone());
//! tokio::spawn(server.run(shutdown_rx));
//! ```

pub mod routes;

use std::net::SocketAddr;

use axum::{Router, routing::get};
use tokio::sync::watch;

use crate::error::{ConfigError, Result};
use crate::validation::metrics::SharedMetricsRegistry;

/// Configuration for the metrics server.
#[derive(Debug, Clone)]
pub struct MetricsServerConfig {
    /// Port to listen on.
    pub port: u16,
    /// Host address to bind to.
    pub host: String,
}

impl Default for MetricsServerConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl MetricsServerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the port number.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Sets the host address.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

impl From<&crate::config::types::MetricsConfig> for MetricsServerConfig {
    fn from(config: &crate::config::types::MetricsConfig) -> Self {
        Self::new().host(config.host.clone()).port(config.port)
    }
}

/// HTTP server exposing `/metrics` and `/health`.
pub struct MetricsServer {
    config: MetricsServerConfig,
    registry: SharedMetricsRegistry,
}

impl MetricsServer {
    pub fn new(config: MetricsServerConfig, registry: SharedMetricsRegistry) -> Self {
        Self { config, registry }
    }

    /// Build the router without binding, for in-process requests.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(routes::health))
            .route("/health", get(routes::health))
            .route("/metrics", get(routes::metrics))
            .with_state(self.registry.clone())
    }

    /// Returns the address the server will listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Serve until the shutdown signal fires.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let addr: SocketAddr = self
            .addr()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(format!("metrics address: {}", e)))?;
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        log::info!("Metrics server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.wait_for(|stop| *stop).await;
            })
            .await?;
        Ok(())
    }
}
