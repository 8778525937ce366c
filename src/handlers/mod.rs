//! Command handlers for `compliance-ctl`.

pub mod rules;
pub mod run;
pub mod sweep;

pub use rules::handle_rules;
pub use run::handle_run;
pub use sweep::handle_sweep;

use kube::Client;
use kube::config::{Config, KubeConfigOptions, Kubeconfig};

use crate::error::Result;
use crate::validation::{MetricsRegistry, ValidationRegistry, rules as builtin};

/// Connect to the cluster using the given kubeconfig context, or the
/// in-cluster/current context when none is given.
pub async fn connect(context: Option<&str>) -> Result<Client> {
    // TLS to the API server needs a process-wide crypto provider
    let _ = rustls::crypto::ring::default_provider().install_default();

    let config = match context {
        Some(context) => {
            let kubeconfig = Kubeconfig::read()?;
            Config::from_custom_kubeconfig(
                kubeconfig,
                &KubeConfigOptions {
                    context: Some(context.to_string()),
                    ..Default::default()
                },
            )
            .await?
        }
        None => Config::infer().await?,
    };

    log::debug!("Connecting to Kubernetes API at {}", config.cluster_url);
    Ok(Client::try_from(config)?)
}

/// Build the rule registry with every built-in rule wired to `metrics`.
pub fn build_registry(metrics: &MetricsRegistry) -> ValidationRegistry {
    let mut builder = ValidationRegistry::builder();
    builtin::register_builtin(&mut builder, metrics);
    let registry = builder.build();
    if registry.is_empty() {
        log::warn!("No compliance rules registered");
    }
    registry
}
