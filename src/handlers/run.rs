use std::sync::Arc;

use tokio::sync::watch;

use crate::config::types::Config;
use crate::error::Result;
use crate::server::{MetricsServer, MetricsServerConfig};
use crate::validation::{
    Dispatcher, KubeAccessor, KubeLister, ListScope, MetricsRegistry, SweepContext, run_sweeps,
    watch::watch_kind,
};

/// Watch every kind a rule applies to, sweep on a timer and serve the
/// gauges until Ctrl-C.
pub async fn handle_run(config: &Config) -> Result<()> {
    let client = super::connect(config.cluster.context.as_deref()).await?;
    let scope = ListScope::from_namespace(config.sweep.namespace.as_deref());

    let metrics = Arc::new(MetricsRegistry::new());
    let registry = Arc::new(super::build_registry(&metrics));
    let kinds = registry.kinds();
    let accessor = Arc::new(KubeAccessor);
    let dispatcher = Arc::new(Dispatcher::new(registry, accessor.clone()));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = Vec::new();

    for kind in kinds {
        tasks.push(tokio::spawn(watch_kind(
            client.clone(),
            kind,
            scope.clone(),
            dispatcher.clone(),
            shutdown_rx.clone(),
        )));
    }

    let ctx = SweepContext::new(
        Arc::new(KubeLister::new(client)),
        accessor,
        shutdown_rx.clone(),
    )
    .with_scope(scope)
    .with_list_timeout(config.sweep.list_timeout());
    tasks.push(tokio::spawn(run_sweeps(
        dispatcher,
        ctx,
        config.sweep.interval(),
    )));

    let server = MetricsServer::new(MetricsServerConfig::from(&config.metrics), metrics);
    let server_task = tokio::spawn(server.run(shutdown_rx));

    log::info!(
        "Compliance engine running (sweep every {}s)",
        config.sweep.interval_secs
    );

    tokio::signal::ctrl_c().await?;
    log::info!("Shutting down");
    let _ = shutdown_tx.send(true);

    for task in tasks {
        if let Err(e) = task.await {
            log::error!("Background task failed: {}", e);
        }
    }

    match server_task.await {
        Ok(result) => result,
        Err(e) => {
            log::error!("Metrics server task failed: {}", e);
            Ok(())
        }
    }
}
