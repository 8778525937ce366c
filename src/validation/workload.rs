//! Typed workload objects handed to the engine.

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use kube::ResourceExt;

use super::types::{ResourceIdentity, WorkloadKind};

/// A workload object of one of the supported kinds.
///
/// Each variant carries the full API object so accessors can read any field
/// they need without guessing at shapes.
#[derive(Debug, Clone)]
pub enum Workload {
    Deployment(Box<Deployment>),
    ReplicaSet(Box<ReplicaSet>),
    StatefulSet(Box<StatefulSet>),
}

impl Workload {
    /// Get the workload kind.
    pub fn kind(&self) -> WorkloadKind {
        match self {
            Self::Deployment(_) => WorkloadKind::Deployment,
            Self::ReplicaSet(_) => WorkloadKind::ReplicaSet,
            Self::StatefulSet(_) => WorkloadKind::StatefulSet,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Self::Deployment(d) => d.name_any(),
            Self::ReplicaSet(r) => r.name_any(),
            Self::StatefulSet(s) => s.name_any(),
        }
    }

    /// Namespace of the object; empty when unset.
    pub fn namespace(&self) -> String {
        let ns = match self {
            Self::Deployment(d) => d.namespace(),
            Self::ReplicaSet(r) => r.namespace(),
            Self::StatefulSet(s) => s.namespace(),
        };
        ns.unwrap_or_default()
    }

    /// Build the dispatch identity from the object's own metadata.
    pub fn identity(&self) -> ResourceIdentity {
        ResourceIdentity::new(self.namespace(), self.name(), self.kind())
    }
}

impl From<Deployment> for Workload {
    fn from(d: Deployment) -> Self {
        Self::Deployment(Box::new(d))
    }
}

impl From<ReplicaSet> for Workload {
    fn from(r: ReplicaSet) -> Self {
        Self::ReplicaSet(Box::new(r))
    }
}

impl From<StatefulSet> for Workload {
    fn from(s: StatefulSet) -> Self {
        Self::StatefulSet(Box::new(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    #[test]
    fn test_identity_from_metadata() {
        let rs = ReplicaSet {
            metadata: ObjectMeta {
                name: Some("web-rs".into()),
                namespace: Some("default".into()),
                ..Default::default()
            },
            ..Default::default()
        };
        let workload = Workload::from(rs);
        assert_eq!(workload.kind(), WorkloadKind::ReplicaSet);
        assert_eq!(
            workload.identity(),
            ResourceIdentity::new("default", "web-rs", WorkloadKind::ReplicaSet)
        );
    }

    #[test]
    fn test_missing_namespace_is_empty() {
        let workload = Workload::from(Deployment::default());
        assert_eq!(workload.namespace(), "");
    }
}
