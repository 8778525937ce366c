//! Incremental event source backed by kube watchers.
//!
//! One watcher stream runs per workload kind. Events on a single stream are
//! handled one after another, which gives the at-most-one in-flight
//! evaluation per identity the rules rely on.

use std::fmt::Debug;
use std::pin::pin;
use std::sync::Arc;

use futures_util::StreamExt;
use k8s_openapi::api::apps::v1::{Deployment, ReplicaSet, StatefulSet};
use kube::runtime::{WatchStreamExt, watcher};
use kube::{Client, Resource};
use serde::de::DeserializeOwned;
use tokio::sync::watch;

use super::dispatch::Dispatcher;
use super::lister::{ListScope, scoped_api};
use super::sweep::stopped;
use super::types::WorkloadKind;
use super::workload::Workload;

/// Watch one kind and feed every change into `dispatcher` until shutdown.
pub async fn watch_kind(
    client: Client,
    kind: WorkloadKind,
    scope: ListScope,
    dispatcher: Arc<Dispatcher>,
    shutdown: watch::Receiver<bool>,
) {
    log::info!("Watching {} objects", kind);
    match kind {
        WorkloadKind::Deployment => {
            watch_typed::<Deployment>(client, &scope, &dispatcher, shutdown).await
        }
        WorkloadKind::ReplicaSet => {
            watch_typed::<ReplicaSet>(client, &scope, &dispatcher, shutdown).await
        }
        WorkloadKind::StatefulSet => {
            watch_typed::<StatefulSet>(client, &scope, &dispatcher, shutdown).await
        }
    }
}

async fn watch_typed<K>(
    client: Client,
    scope: &ListScope,
    dispatcher: &Dispatcher,
    mut shutdown: watch::Receiver<bool>,
) where
    K: Resource<Scope = k8s_openapi::NamespaceResourceScope>
        + Clone
        + DeserializeOwned
        + Debug
        + Send
        + 'static
        + Into<Workload>,
    <K as Resource>::DynamicType: Default,
{
    let api = scoped_api::<K>(client, scope);
    let mut stream = pin!(watcher(api, watcher::Config::default()).default_backoff());

    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(event)) => handle_event(dispatcher, event),
                Some(Err(e)) => log::warn!("Watch error: {}", e),
                None => {
                    log::warn!("Watch stream ended");
                    return;
                }
            },
            Ok(()) = stopped(&mut shutdown) => return,
        }
    }
}

fn handle_event<K: Into<Workload>>(dispatcher: &Dispatcher, event: watcher::Event<K>) {
    match event {
        watcher::Event::Apply(obj) | watcher::Event::InitApply(obj) => {
            dispatcher.on_apply(&obj.into());
        }
        watcher::Event::Delete(obj) => {
            let workload: Workload = obj.into();
            dispatcher.on_delete(&workload.identity());
        }
        watcher::Event::Init => log::debug!("Watch (re)initialising"),
        watcher::Event::InitDone => log::debug!("Watch initial listing complete"),
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::validation::accessor::KubeAccessor;
    use crate::validation::metrics::{ComplianceMetricSink, GaugeSink};
    use crate::validation::registry::RegistryBuilder;
    use crate::validation::rules::RequestLimitRule;
    use k8s_openapi::api::apps::v1::ReplicaSetSpec;
    use k8s_openapi::api::core::v1::{PodSpec, PodTemplateSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

    fn replica_set() -> ReplicaSet {
        ReplicaSet {
            metadata: ObjectMeta {
                name: Some("web-rs".into()),
                namespace: Some("default".into()),
                ..Default::default()
            },
            spec: Some(ReplicaSetSpec {
                replicas: Some(1),
                template: Some(PodTemplateSpec {
                    metadata: None,
                    spec: Some(PodSpec::default()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_watch_events_drive_metric_lifecycle() {
        let sink = GaugeSink::new("watch_request_limit_validation", "help").unwrap();
        let mut builder = RegistryBuilder::new();
        builder.register(RequestLimitRule::new(sink.clone()));
        let dispatcher = Dispatcher::new(Arc::new(builder.build()), Arc::new(KubeAccessor));
        let identity = Workload::from(replica_set()).identity();

        handle_event(&dispatcher, watcher::Event::InitApply(replica_set()));
        assert_eq!(sink.value(&identity), Some(0.0));

        handle_event(&dispatcher, watcher::Event::<ReplicaSet>::InitDone);
        assert_eq!(sink.value(&identity), Some(0.0));

        handle_event(&dispatcher, watcher::Event::Delete(replica_set()));
        assert_eq!(sink.value(&identity), None);
    }
}
