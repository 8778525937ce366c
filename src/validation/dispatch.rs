//! Event dispatch.
//!
//! The dispatcher routes each incoming event, or each item produced by a
//! sweep, to every registered rule whose applicability set contains the
//! object's kind.

use std::sync::Arc;

use super::accessor::ResourceAccessor;
use super::error::ValidationError;
use super::registry::ValidationRegistry;
use super::rule::ObjectState;
use super::sweep::SweepContext;
use super::types::{ResourceIdentity, WorkloadSnapshot};
use super::workload::Workload;

pub struct Dispatcher {
    registry: Arc<ValidationRegistry>,
    accessor: Arc<dyn ResourceAccessor>,
}

impl Dispatcher {
    pub fn new(registry: Arc<ValidationRegistry>, accessor: Arc<dyn ResourceAccessor>) -> Self {
        Self { registry, accessor }
    }

    /// Dispatch one event to every applicable rule.
    ///
    /// `object` may be `None` when `is_deleted` is true. Objects the accessor
    /// cannot interpret are logged and skipped.
    pub fn on_event(&self, identity: &ResourceIdentity, object: Option<&Workload>, is_deleted: bool) {
        if self.registry.rules_for(identity.kind).next().is_none() {
            log::trace!("No rules apply to {}", identity);
            return;
        }

        if is_deleted {
            for rule in self.registry.rules_for(identity.kind) {
                rule.evaluate(identity, ObjectState::Deleted);
            }
            return;
        }

        let snapshot = match self.resolve(identity, object) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::warn!("Skipping {}: {}", identity, e);
                return;
            }
        };

        for rule in self.registry.rules_for(identity.kind) {
            rule.evaluate(identity, ObjectState::Present(&snapshot));
        }
    }

    /// Convenience for live objects: identity is taken from the object itself.
    pub fn on_apply(&self, workload: &Workload) {
        self.on_event(&workload.identity(), Some(workload), false);
    }

    /// Convenience for deletions observed with their last known state.
    pub fn on_delete(&self, identity: &ResourceIdentity) {
        self.on_event(identity, None, true);
    }

    /// Run every rule's sweep, one rule at a time.
    pub async fn sweep(&self, ctx: &SweepContext) {
        for rule in self.registry.rules() {
            if ctx.is_cancelled() {
                log::info!("Sweep cancelled before rule '{}'", rule.name());
                return;
            }
            rule.evaluate_sweep(ctx).await;
        }
    }

    fn resolve(
        &self,
        identity: &ResourceIdentity,
        object: Option<&Workload>,
    ) -> Result<WorkloadSnapshot, ValidationError> {
        let workload = object.ok_or(ValidationError::MissingObject(identity.kind))?;
        if workload.kind() != identity.kind {
            return Err(ValidationError::KindMismatch {
                identity: identity.kind,
                object: workload.kind(),
            });
        }
        self.accessor.snapshot(workload)
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::validation::accessor::KubeAccessor;
    use crate::validation::metrics::{ComplianceMetricSink, GaugeSink};
    use crate::validation::registry::RegistryBuilder;
    use crate::validation::rule::ValidationRule;
    use crate::validation::rules::RequestLimitRule;
    use crate::validation::types::WorkloadKind;
    use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec, StatefulSet, StatefulSetSpec};
    use k8s_openapi::api::core::v1::{Container, PodSpec, PodTemplateSpec};
    use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    /// Records every call it receives.
    struct RecordingRule {
        kinds: BTreeSet<WorkloadKind>,
        calls: Mutex<Vec<(ResourceIdentity, bool)>>,
    }

    impl ValidationRule for RecordingRule {
        fn name(&self) -> &str {
            "recording"
        }

        fn description(&self) -> &str {
            "records calls"
        }

        fn applies_to(&self) -> &BTreeSet<WorkloadKind> {
            &self.kinds
        }

        fn evaluate(&self, identity: &ResourceIdentity, state: ObjectState<'_>) {
            let deleted = matches!(state, ObjectState::Deleted);
            self.calls.lock().unwrap().push((identity.clone(), deleted));
        }
    }

    struct SharedRule(Arc<RecordingRule>);

    impl ValidationRule for SharedRule {
        fn name(&self) -> &str {
            self.0.name()
        }

        fn description(&self) -> &str {
            self.0.description()
        }

        fn applies_to(&self) -> &BTreeSet<WorkloadKind> {
            self.0.applies_to()
        }

        fn evaluate(&self, identity: &ResourceIdentity, state: ObjectState<'_>) {
            self.0.evaluate(identity, state)
        }
    }

    fn pod_template() -> PodTemplateSpec {
        PodTemplateSpec {
            metadata: None,
            spec: Some(PodSpec {
                containers: vec![Container {
                    name: "app".into(),
                    ..Default::default()
                }],
                ..Default::default()
            }),
        }
    }

    fn deployment(name: &str) -> Workload {
        Deployment {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some("default".into()),
                ..Default::default()
            },
            spec: Some(DeploymentSpec {
                replicas: Some(2),
                template: pod_template(),
                ..Default::default()
            }),
            ..Default::default()
        }
        .into()
    }

    fn stateful_set(name: &str) -> Workload {
        StatefulSet {
            metadata: ObjectMeta {
                name: Some(name.into()),
                namespace: Some("default".into()),
                ..Default::default()
            },
            spec: Some(StatefulSetSpec {
                template: pod_template(),
                ..Default::default()
            }),
            ..Default::default()
        }
        .into()
    }

    fn recording_dispatcher(kinds: &[WorkloadKind]) -> (Dispatcher, Arc<RecordingRule>) {
        let rule = Arc::new(RecordingRule {
            kinds: kinds.iter().copied().collect(),
            calls: Mutex::new(Vec::new()),
        });
        let mut builder = RegistryBuilder::new();
        builder.register(SharedRule(Arc::clone(&rule)));
        let dispatcher = Dispatcher::new(Arc::new(builder.build()), Arc::new(KubeAccessor));
        (dispatcher, rule)
    }

    #[test]
    fn test_rule_not_invoked_outside_applicability() {
        let (dispatcher, rule) = recording_dispatcher(&[WorkloadKind::Deployment]);
        dispatcher.on_apply(&stateful_set("db"));
        assert!(rule.calls.lock().unwrap().is_empty());

        dispatcher.on_apply(&deployment("web"));
        assert_eq!(rule.calls.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_delete_needs_no_object() {
        let (dispatcher, rule) = recording_dispatcher(&[WorkloadKind::Deployment]);
        let id = ResourceIdentity::new("default", "web", WorkloadKind::Deployment);
        dispatcher.on_delete(&id);
        assert_eq!(rule.calls.lock().unwrap().as_slice(), &[(id, true)]);
    }

    #[test]
    fn test_unsupported_shape_is_skipped() {
        let (dispatcher, rule) = recording_dispatcher(&[WorkloadKind::Deployment]);
        let broken: Workload = Deployment::default().into();
        let id = ResourceIdentity::new("default", "broken", WorkloadKind::Deployment);
        dispatcher.on_event(&id, Some(&broken), false);
        assert!(rule.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_object_and_kind_mismatch_are_skipped() {
        let (dispatcher, rule) =
            recording_dispatcher(&[WorkloadKind::Deployment, WorkloadKind::StatefulSet]);
        let id = ResourceIdentity::new("default", "web", WorkloadKind::StatefulSet);
        dispatcher.on_event(&id, None, false);
        dispatcher.on_event(&id, Some(&deployment("web")), false);
        assert!(rule.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_dispatch_to_request_limit_rule() {
        let sink = GaugeSink::new("dispatch_request_limit_validation", "help").unwrap();
        let mut builder = RegistryBuilder::new();
        builder.register(RequestLimitRule::new(sink.clone()));
        let dispatcher = Dispatcher::new(Arc::new(builder.build()), Arc::new(KubeAccessor));

        let workload = deployment("web");
        dispatcher.on_apply(&workload);
        // The template container declares no resources at all
        assert_eq!(sink.value(&workload.identity()), Some(1.0));

        dispatcher.on_delete(&workload.identity());
        assert_eq!(sink.value(&workload.identity()), None);
    }
}
