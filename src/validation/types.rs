//! Core types for the compliance engine.
//!
//! - `WorkloadKind` - the closed set of workload kinds rules can target
//! - `ResourceIdentity` - the (namespace, name, kind) key of one workload
//! - `ContainerResourceSpec` / `WorkloadSnapshot` - the normalized view rules evaluate
//! - `Verdict` - the outcome of a rule over one snapshot

use k8s_openapi::apimachinery::pkg::api::resource::Quantity;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::quantity::is_nonzero;

/// Workload kinds the engine knows how to snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkloadKind {
    Deployment,
    ReplicaSet,
    StatefulSet,
}

impl WorkloadKind {
    /// Get the string representation matching Kubernetes kind names.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::ReplicaSet => "ReplicaSet",
            Self::StatefulSet => "StatefulSet",
        }
    }
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unique key of one workload instance.
///
/// Used both as the metric label set and as the dispatch key. Stable for the
/// lifetime of the object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceIdentity {
    pub namespace: String,
    pub name: String,
    pub kind: WorkloadKind,
}

impl ResourceIdentity {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: WorkloadKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
        }
    }

    /// Label values in `{namespace, name, kind}` order.
    pub fn label_values(&self) -> [&str; 3] {
        [&self.namespace, &self.name, self.kind.as_str()]
    }
}

impl fmt::Display for ResourceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.kind, self.namespace, self.name)
    }
}

/// Resource declarations of a single container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerResourceSpec {
    pub name: String,
    pub request_cpu: Option<Quantity>,
    pub request_memory: Option<Quantity>,
    pub limit_cpu: Option<Quantity>,
    pub limit_memory: Option<Quantity>,
}

impl ContainerResourceSpec {
    /// True when all four quantities are present and non-zero.
    pub fn is_fully_specified(&self) -> bool {
        self.unset_fields().is_empty()
    }

    /// Names of the quantities that are absent or zero.
    pub fn unset_fields(&self) -> Vec<&'static str> {
        [
            ("requests.cpu", &self.request_cpu),
            ("requests.memory", &self.request_memory),
            ("limits.cpu", &self.limit_cpu),
            ("limits.memory", &self.limit_memory),
        ]
        .into_iter()
        .filter(|(_, q)| !q.as_ref().is_some_and(is_nonzero))
        .map(|(field, _)| field)
        .collect()
    }
}

/// Normalized, read-only view of a workload, recomputed on every evaluation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkloadSnapshot {
    pub replica_count: u32,
    pub containers: Vec<ContainerResourceSpec>,
}

/// Outcome of a rule over one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Compliant,
    NonCompliant {
        /// Container that triggered the verdict.
        container: String,
        /// Quantities that were absent or zero.
        missing: Vec<&'static str>,
    },
}

impl Verdict {
    /// Gauge value exported for this verdict.
    pub fn gauge_value(&self) -> f64 {
        match self {
            Self::Compliant => 0.0,
            Self::NonCompliant { .. } => 1.0,
        }
    }
}
