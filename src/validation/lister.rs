//! Listing collaborators used by the sweep path.

use async_trait::async_trait;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use kube::api::{Api, ListParams};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;

use super::error::ValidationError;
use super::types::{ResourceIdentity, WorkloadKind};
use super::workload::Workload;

/// Namespace scope of a listing call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListScope {
    #[default]
    AllNamespaces,
    Namespace(String),
}

impl ListScope {
    pub fn from_namespace(namespace: Option<&str>) -> Self {
        match namespace {
            Some(ns) if !ns.is_empty() => Self::Namespace(ns.to_string()),
            _ => Self::AllNamespaces,
        }
    }
}

/// Build an `Api` for a namespaced kind restricted to `scope`.
pub(crate) fn scoped_api<K>(client: Client, scope: &ListScope) -> Api<K>
where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope>,
    <K as Resource>::DynamicType: Default,
{
    match scope {
        ListScope::AllNamespaces => Api::all(client),
        ListScope::Namespace(ns) => Api::namespaced(client, ns),
    }
}

/// Enumerates live workloads of one kind.
#[async_trait]
pub trait WorkloadLister: Send + Sync {
    async fn list(
        &self,
        kind: WorkloadKind,
        scope: &ListScope,
    ) -> Result<Vec<(ResourceIdentity, Workload)>, ValidationError>;
}

/// Lister backed by the Kubernetes API.
#[derive(Clone)]
pub struct KubeLister {
    client: Client,
}

impl KubeLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn list_typed<K>(
        &self,
        kind: WorkloadKind,
        scope: &ListScope,
    ) -> Result<Vec<(ResourceIdentity, Workload)>, ValidationError>
    where
        K: Resource<Scope = k8s_openapi::NamespaceResourceScope>
            + Clone
            + DeserializeOwned
            + std::fmt::Debug
            + Into<Workload>,
        <K as Resource>::DynamicType: Default,
    {
        let list = scoped_api::<K>(self.client.clone(), scope)
            .list(&ListParams::default())
            .await
            .map_err(|source| ValidationError::Listing { kind, source })?;

        Ok(list
            .items
            .into_iter()
            .map(|item| {
                let workload: Workload = item.into();
                (workload.identity(), workload)
            })
            .collect())
    }
}

#[async_trait]
impl WorkloadLister for KubeLister {
    async fn list(
        &self,
        kind: WorkloadKind,
        scope: &ListScope,
    ) -> Result<Vec<(ResourceIdentity, Workload)>, ValidationError> {
        match kind {
            WorkloadKind::Deployment => self.list_typed::<Deployment>(kind, scope).await,
            WorkloadKind::ReplicaSet => self.list_typed::<ReplicaSet>(kind, scope).await,
            WorkloadKind::StatefulSet => self.list_typed::<StatefulSet>(kind, scope).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_namespace() {
        assert_eq!(ListScope::from_namespace(None), ListScope::AllNamespaces);
        assert_eq!(ListScope::from_namespace(Some("")), ListScope::AllNamespaces);
        assert_eq!(
            ListScope::from_namespace(Some("prod")),
            ListScope::Namespace("prod".into())
        );
    }
}
