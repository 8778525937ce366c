//! CPU and memory requests/limits presence rule.

use std::collections::BTreeSet;

use crate::validation::metrics::{ComplianceMetricSink, GaugeSink, MetricsRegistry, MetricsResult};
use crate::validation::rule::{ObjectState, ValidationRule};
use crate::validation::types::{ResourceIdentity, Verdict, WorkloadKind, WorkloadSnapshot};

pub const RULE_NAME: &str = "request_limit_validation";
const RULE_HELP: &str = "resource does not have requests or limits.";

/// Flags workloads whose containers lack CPU/memory requests or limits.
///
/// Exports 1 when the first offending container is found and 0 when every
/// container declares all four quantities.
pub struct RequestLimitRule<S> {
    kinds: BTreeSet<WorkloadKind>,
    sink: S,
}

impl<S: ComplianceMetricSink> RequestLimitRule<S> {
    /// Build the rule around an existing sink.
    pub fn new(sink: S) -> Self {
        Self {
            kinds: BTreeSet::from([WorkloadKind::Deployment, WorkloadKind::ReplicaSet]),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl RequestLimitRule<GaugeSink> {
    /// Build the rule and register its gauge with `registry`.
    pub fn register(registry: &MetricsRegistry) -> MetricsResult<Self> {
        Ok(Self::new(registry.compliance_gauge(RULE_NAME, RULE_HELP)?))
    }
}

/// Compute the verdict for one snapshot.
///
/// Returns `None` for workloads scaled to zero: they are neither marked
/// compliant nor non-compliant. Only the first offending container is
/// reported.
pub fn verdict(snapshot: &WorkloadSnapshot) -> Option<Verdict> {
    if snapshot.replica_count == 0 {
        return None;
    }

    let offending = snapshot
        .containers
        .iter()
        .find(|c| !c.is_fully_specified())
        .map(|c| Verdict::NonCompliant {
            container: c.name.clone(),
            missing: c.unset_fields(),
        });

    Some(offending.unwrap_or(Verdict::Compliant))
}

impl<S: ComplianceMetricSink> ValidationRule for RequestLimitRule<S> {
    fn name(&self) -> &str {
        RULE_NAME
    }

    fn description(&self) -> &str {
        "Detects workloads with containers missing CPU or memory requests or limits"
    }

    fn applies_to(&self) -> &BTreeSet<WorkloadKind> {
        &self.kinds
    }

    fn evaluate(&self, identity: &ResourceIdentity, state: ObjectState<'_>) {
        log::debug!("Validating limits for {}", identity);

        let snapshot = match state {
            ObjectState::Deleted => {
                self.sink.delete(identity);
                return;
            }
            ObjectState::Present(snapshot) => snapshot,
        };

        match verdict(snapshot) {
            None => log::debug!("{} has no replicas, leaving metric untouched", identity),
            Some(v) => {
                if let Verdict::NonCompliant { container, missing } = &v {
                    log::info!(
                        "{}: container '{}' does not have requests or limits set ({})",
                        identity,
                        container,
                        missing.join(", ")
                    );
                }
                self.sink.set(identity, v.gauge_value());
            }
        }
    }
}
