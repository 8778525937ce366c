//! Resource accessors.
//!
//! An accessor turns a [`Workload`] into a [`WorkloadSnapshot`]. Each supported
//! kind has an explicit extraction function, so adding a kind to
//! [`Workload`] fails to compile until the accessor learns about it.

use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use k8s_openapi::api::core::v1::{Container, PodTemplateSpec};

use super::error::ValidationError;
use super::types::{ContainerResourceSpec, WorkloadKind, WorkloadSnapshot};
use super::workload::Workload;

/// Replica count assumed when the spec leaves it unset.
pub const DEFAULT_REPLICAS: i32 = 1;

/// Produces a normalized snapshot from a workload object.
pub trait ResourceAccessor: Send + Sync {
    fn snapshot(&self, workload: &Workload) -> Result<WorkloadSnapshot, ValidationError>;
}

/// Accessor backed by the typed `k8s-openapi` structs.
#[derive(Debug, Default, Clone, Copy)]
pub struct KubeAccessor;

impl ResourceAccessor for KubeAccessor {
    fn snapshot(&self, workload: &Workload) -> Result<WorkloadSnapshot, ValidationError> {
        match workload {
            Workload::Deployment(d) => deployment_snapshot(d),
            Workload::ReplicaSet(r) => replica_set_snapshot(r),
            Workload::StatefulSet(s) => stateful_set_snapshot(s),
        }
    }
}

fn deployment_snapshot(deployment: &Deployment) -> Result<WorkloadSnapshot, ValidationError> {
    let name = deployment.metadata.name.as_deref().unwrap_or_default();
    let spec = deployment.spec.as_ref().ok_or_else(|| {
        ValidationError::unsupported_shape(WorkloadKind::Deployment, name, "missing spec")
    })?;
    build_snapshot(
        WorkloadKind::Deployment,
        name,
        spec.replicas,
        Some(&spec.template),
    )
}

fn replica_set_snapshot(replica_set: &ReplicaSet) -> Result<WorkloadSnapshot, ValidationError> {
    let name = replica_set.metadata.name.as_deref().unwrap_or_default();
    let spec = replica_set.spec.as_ref().ok_or_else(|| {
        ValidationError::unsupported_shape(WorkloadKind::ReplicaSet, name, "missing spec")
    })?;
    build_snapshot(
        WorkloadKind::ReplicaSet,
        name,
        spec.replicas,
        spec.template.as_ref(),
    )
}

fn stateful_set_snapshot(stateful_set: &StatefulSet) -> Result<WorkloadSnapshot, ValidationError> {
    let name = stateful_set.metadata.name.as_deref().unwrap_or_default();
    let spec = stateful_set.spec.as_ref().ok_or_else(|| {
        ValidationError::unsupported_shape(WorkloadKind::StatefulSet, name, "missing spec")
    })?;
    build_snapshot(
        WorkloadKind::StatefulSet,
        name,
        spec.replicas,
        Some(&spec.template),
    )
}

/// Shared tail of every per-kind extractor: replicas plus pod template.
fn build_snapshot(
    kind: WorkloadKind,
    name: &str,
    replicas: Option<i32>,
    template: Option<&PodTemplateSpec>,
) -> Result<WorkloadSnapshot, ValidationError> {
    let replicas = replicas.unwrap_or(DEFAULT_REPLICAS);
    let replica_count = u32::try_from(replicas).map_err(|_| {
        ValidationError::unsupported_shape(kind, name, format!("negative replicas ({replicas})"))
    })?;

    let pod_spec = template
        .and_then(|t| t.spec.as_ref())
        .ok_or_else(|| ValidationError::unsupported_shape(kind, name, "missing pod template"))?;

    Ok(WorkloadSnapshot {
        replica_count,
        containers: pod_spec.containers.iter().map(container_resources).collect(),
    })
}

fn container_resources(container: &Container) -> ContainerResourceSpec {
    let resources = container.resources.as_ref();
    let requests = resources.and_then(|r| r.requests.as_ref());
    let limits = resources.and_then(|r| r.limits.as_ref());

    ContainerResourceSpec {
        name: container.name.clone(),
        request_cpu: requests.and_then(|r| r.get("cpu")).cloned(),
        request_memory: requests.and_then(|r| r.get("memory")).cloned(),
        limit_cpu: limits.and_then(|l| l.get("cpu")).cloned(),
        limit_memory: limits.and_then(|l| l.get("memory")).cloned(),
    }
}
