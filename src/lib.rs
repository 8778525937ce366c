//! # Workload Compliance
//!
//! Continuously checks Kubernetes workloads against pluggable compliance
//! rules and exports each resource's pass/fail state as a Prometheus gauge.
//!
//! ## Features
//!
//! - **Rule Registry**: Rules declare the workload kinds they apply to and own one gauge each
//! - **Event Driven**: Watcher events update gauges as objects change or disappear
//! - **Periodic Sweeps**: Full listings correct drift from missed events
//! - **Metrics Endpoint**: `/metrics` in Prometheus text format
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use workload_compliance::validation::{Dispatcher, KubeAccessor, MetricsRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let metrics = MetricsRegistry::new();
//! let registry = workload_compliance::handlers::build_registry(&metrics);
//! let dispatcher = Dispatcher::new(Arc::new(registry), Arc::new(KubeAccessor));
//! # let _ = dispatcher;
//! println!("{}", metrics.encode_text()?);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod server;
pub mod validation;

pub use error::{ComplianceError, Result};
use cli::Commands;
use config::types::Config;

/// The current version of the CLI tool
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn run_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { .. } => handlers::handle_run(config).await,
        Commands::Sweep { format } => handlers::handle_sweep(config, format).await,
        Commands::Rules => handlers::handle_rules(),
    }
}

/// Fold command-line overrides into the loaded configuration.
pub fn apply_overrides(config: &mut Config, cli: &cli::Cli) {
    if let Some(namespace) = &cli.namespace {
        config.sweep.namespace = Some(namespace.clone());
    }
    if let Some(context) = &cli.context {
        config.cluster.context = Some(context.clone());
    }
    if let Commands::Run {
        sweep_interval,
        port,
        host,
    } = &cli.command
    {
        if let Some(secs) = sweep_interval {
            config.sweep.interval_secs = *secs;
        }
        if let Some(port) = port {
            config.metrics.port = *port;
        }
        if let Some(host) = host {
            config.metrics.host = host.clone();
        }
    }
}
