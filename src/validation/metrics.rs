//! Compliance gauges.
//!
//! Every rule owns one gauge family labeled `{namespace, name, kind}`. A
//! series exists only while the engine considers the resource live; a missing
//! series means "not observed" and is distinct from a value of 0.
//!
//! Gauge registration is an explicit startup step on [`MetricsRegistry`],
//! kept apart from verdict computation so rules can be tested against an
//! isolated registry.

use std::sync::Arc;

use prometheus::core::Collector;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use thiserror::Error;

use super::types::ResourceIdentity;

/// Label names shared by every compliance gauge.
pub const IDENTITY_LABELS: [&str; 3] = ["namespace", "name", "kind"];

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Failed to create or register a metric with Prometheus.
    #[error("failed to register metric: {0}")]
    RegistrationFailed(#[from] prometheus::Error),

    /// Failed to encode metrics output.
    #[error("failed to encode metrics: {0}")]
    EncodingFailed(String),
}

/// Result type for metrics operations.
pub type MetricsResult<T> = Result<T, MetricsError>;

/// Destination for compliance verdicts.
///
/// Implementations must tolerate concurrent calls for different identities.
/// Calls for one identity are serialized by the caller.
pub trait ComplianceMetricSink: Send + Sync {
    /// Create or overwrite the series for `identity`.
    fn set(&self, identity: &ResourceIdentity, value: f64);

    /// Remove the series for `identity`. Removing an absent series is a no-op.
    fn delete(&self, identity: &ResourceIdentity);

    /// Current value of the series, or `None` when it does not exist.
    fn value(&self, identity: &ResourceIdentity) -> Option<f64>;
}

/// [`ComplianceMetricSink`] backed by a Prometheus `GaugeVec`.
#[derive(Clone)]
pub struct GaugeSink {
    gauge: GaugeVec,
}

impl GaugeSink {
    /// Create an unregistered gauge family.
    pub fn new(name: &str, help: &str) -> MetricsResult<Self> {
        let gauge = GaugeVec::new(Opts::new(name, help), &IDENTITY_LABELS)?;
        Ok(Self { gauge })
    }

    /// Number of series currently exported.
    pub fn series_count(&self) -> usize {
        self.gauge
            .collect()
            .iter()
            .map(|family| family.get_metric().len())
            .sum()
    }
}

impl ComplianceMetricSink for GaugeSink {
    fn set(&self, identity: &ResourceIdentity, value: f64) {
        self.gauge
            .with_label_values(&identity.label_values())
            .set(value);
    }

    fn delete(&self, identity: &ResourceIdentity) {
        // Err only means the series was never created
        let _ = self.gauge.remove_label_values(&identity.label_values());
    }

    fn value(&self, identity: &ResourceIdentity) -> Option<f64> {
        let wanted = identity.label_values();
        self.gauge
            .collect()
            .iter()
            .flat_map(|family| family.get_metric().iter())
            .find(|metric| {
                IDENTITY_LABELS.iter().zip(wanted).all(|(label, value)| {
                    metric
                        .get_label()
                        .iter()
                        .any(|pair| pair.get_name() == *label && pair.get_value() == value)
                })
            })
            .map(|metric| metric.get_gauge().get_value())
    }
}

/// Owner of the Prometheus registry the compliance gauges are exposed from.
pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    /// Create and register a compliance gauge named after a rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is invalid or already registered.
    pub fn compliance_gauge(&self, name: &str, help: &str) -> MetricsResult<GaugeSink> {
        let sink = GaugeSink::new(name, help)?;
        self.registry.register(Box::new(sink.gauge.clone()))?;
        Ok(sink)
    }

    /// Encodes all metrics in Prometheus text format.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode_text(&self) -> MetricsResult<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::EncodingFailed(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingFailed(e.to_string()))
    }

    /// Returns the underlying Prometheus registry.
    pub fn prometheus_registry(&self) -> &Registry {
        &self.registry
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared metrics registry for the metrics server and the rules.
pub type SharedMetricsRegistry = Arc<MetricsRegistry>;
