//! The validation rule capability.

use std::collections::BTreeSet;

use async_trait::async_trait;

use super::sweep::SweepContext;
use super::types::{ResourceIdentity, WorkloadKind, WorkloadSnapshot};

/// What the event source knows about an object at evaluation time.
#[derive(Debug, Clone, Copy)]
pub enum ObjectState<'a> {
    /// The object exists; here is its current snapshot.
    Present(&'a WorkloadSnapshot),
    /// The object was deleted.
    Deleted,
}

/// A pluggable compliance rule.
///
/// Rules are registered once at startup and never mutated. The dispatcher
/// only calls [`ValidationRule::evaluate`] for kinds listed in
/// [`ValidationRule::applies_to`].
#[async_trait]
pub trait ValidationRule: Send + Sync {
    /// Rule name; also the name of the gauge it exports.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// Kinds this rule can evaluate.
    fn applies_to(&self) -> &BTreeSet<WorkloadKind>;

    /// Evaluate one object and record the outcome.
    fn evaluate(&self, identity: &ResourceIdentity, state: ObjectState<'_>);

    /// List every live instance of every applicable kind and evaluate each.
    ///
    /// Listing failures for one kind are logged and do not stop the others.
    async fn evaluate_sweep(&self, ctx: &SweepContext) {
        for kind in self.applies_to() {
            let items = ctx.list_or_empty(*kind).await;
            log::debug!("Sweeping {} {} object(s) for {}", items.len(), kind, self.name());

            for (identity, workload) in items {
                match ctx.accessor.snapshot(&workload) {
                    Ok(snapshot) => self.evaluate(&identity, ObjectState::Present(&snapshot)),
                    Err(e) => log::warn!("Skipping {} in sweep: {}", identity, e),
                }
            }
        }
    }
}
