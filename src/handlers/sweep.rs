use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

use crate::cli::OutputFormat;
use crate::config::types::Config;
use crate::error::Result;
use crate::validation::{
    Dispatcher, KubeAccessor, KubeLister, ListScope, MetricsRegistry, SweepContext,
};

/// One exported gauge series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GaugeRow {
    pub rule: String,
    pub namespace: String,
    pub name: String,
    pub kind: String,
    pub value: f64,
}

/// Run every rule's sweep once and print the resulting gauges.
pub async fn handle_sweep(config: &Config, format: OutputFormat) -> Result<()> {
    let client = super::connect(config.cluster.context.as_deref()).await?;

    let metrics = MetricsRegistry::new();
    let registry = Arc::new(super::build_registry(&metrics));
    let accessor = Arc::new(KubeAccessor);
    let dispatcher = Dispatcher::new(registry, accessor.clone());

    // Sender stays alive so the sweep is never seen as cancelled
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let ctx = SweepContext::new(Arc::new(KubeLister::new(client)), accessor, shutdown_rx)
        .with_scope(ListScope::from_namespace(config.sweep.namespace.as_deref()))
        .with_list_timeout(config.sweep.list_timeout());

    dispatcher.sweep(&ctx).await;

    match format {
        OutputFormat::Text => print!("{}", metrics.encode_text()?),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&gauge_rows(&metrics))?)
        }
    }

    Ok(())
}

/// Flatten every gauge series in `metrics` into rows sorted by rule and identity.
pub fn gauge_rows(metrics: &MetricsRegistry) -> Vec<GaugeRow> {
    let mut rows = Vec::new();
    for family in metrics.prometheus_registry().gather() {
        for metric in family.get_metric() {
            let label = |key: &str| {
                metric
                    .get_label()
                    .iter()
                    .find(|pair| pair.get_name() == key)
                    .map(|pair| pair.get_value().to_string())
                    .unwrap_or_default()
            };
            rows.push(GaugeRow {
                rule: family.get_name().to_string(),
                namespace: label("namespace"),
                name: label("name"),
                kind: label("kind"),
                value: metric.get_gauge().get_value(),
            });
        }
    }
    rows.sort_by(|a, b| {
        (&a.rule, &a.namespace, &a.name, &a.kind).cmp(&(&b.rule, &b.namespace, &b.name, &b.kind))
    });
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ComplianceMetricSink;
    use crate::validation::types::{ResourceIdentity, WorkloadKind};

    #[test]
    fn test_gauge_rows_sorted_with_labels() {
        let metrics = MetricsRegistry::new();
        let sink = metrics.compliance_gauge("request_limit_validation", "help").unwrap();
        sink.set(&ResourceIdentity::new("prod", "web", WorkloadKind::Deployment), 1.0);
        sink.set(&ResourceIdentity::new("dev", "api", WorkloadKind::ReplicaSet), 0.0);

        let rows = gauge_rows(&metrics);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].namespace, "dev");
        assert_eq!(rows[0].kind, "ReplicaSet");
        assert_eq!(rows[1].name, "web");
        assert_eq!(rows[1].rule, "request_limit_validation");
        assert!((rows[1].value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_gauge_rows_empty_registry() {
        assert!(gauge_rows(&MetricsRegistry::new()).is_empty());
    }
}
