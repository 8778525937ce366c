//! Full-cluster sweep support.
//!
//! A sweep lists every live instance of every kind a rule declares and feeds
//! it through the same evaluation path as events, correcting drift from missed
//! or delayed notifications. Listing calls are bounded by a timeout and can be
//! cancelled through the shutdown signal; either outcome counts as "no items
//! for this kind this cycle".

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::accessor::ResourceAccessor;
use super::dispatch::Dispatcher;
use super::error::ValidationError;
use super::lister::{ListScope, WorkloadLister};
use super::types::{ResourceIdentity, WorkloadKind};
use super::workload::Workload;

/// Default upper bound on a single listing call.
pub const DEFAULT_LIST_TIMEOUT: Duration = Duration::from_secs(30);

/// Everything a rule needs to run its sweep.
#[derive(Clone)]
pub struct SweepContext {
    pub lister: Arc<dyn WorkloadLister>,
    pub accessor: Arc<dyn ResourceAccessor>,
    pub scope: ListScope,
    pub list_timeout: Duration,
    shutdown: watch::Receiver<bool>,
}

impl SweepContext {
    pub fn new(
        lister: Arc<dyn WorkloadLister>,
        accessor: Arc<dyn ResourceAccessor>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            lister,
            accessor,
            scope: ListScope::AllNamespaces,
            list_timeout: DEFAULT_LIST_TIMEOUT,
            shutdown,
        }
    }

    pub fn with_scope(mut self, scope: ListScope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_list_timeout(mut self, timeout: Duration) -> Self {
        self.list_timeout = timeout;
        self
    }

    pub fn is_cancelled(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// List one kind, honouring the timeout and the shutdown signal.
    pub async fn list(
        &self,
        kind: WorkloadKind,
    ) -> Result<Vec<(ResourceIdentity, Workload)>, ValidationError> {
        if self.is_cancelled() {
            return Err(ValidationError::Cancelled(kind));
        }

        let mut shutdown = self.shutdown.clone();
        tokio::select! {
            result = tokio::time::timeout(self.list_timeout, self.lister.list(kind, &self.scope)) => {
                result.map_err(|_| ValidationError::Timeout(kind))?
            }
            Ok(()) = stopped(&mut shutdown) => Err(ValidationError::Cancelled(kind)),
        }
    }

    /// List one kind, logging failures and treating them as an empty listing.
    pub async fn list_or_empty(&self, kind: WorkloadKind) -> Vec<(ResourceIdentity, Workload)> {
        match self.list(kind).await {
            Ok(items) => items,
            Err(e) => {
                log::warn!("Unable to list {}: {}", kind, e);
                Vec::new()
            }
        }
    }
}

/// Resolve once the shutdown flag is set; errors when the sender is gone.
///
/// The watch borrow is dropped before returning, so `select!` arms may await
/// after this branch is polled.
pub(crate) async fn stopped(
    shutdown: &mut watch::Receiver<bool>,
) -> Result<(), watch::error::RecvError> {
    shutdown.wait_for(|stop| *stop).await.map(|_| ())
}

/// Run a sweep every `interval` until the shutdown signal fires.
///
/// The first sweep starts immediately.
pub async fn run_sweeps(dispatcher: Arc<Dispatcher>, ctx: SweepContext, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    let mut shutdown = ctx.shutdown.clone();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                log::debug!("Starting compliance sweep");
                dispatcher.sweep(&ctx).await;
            }
            Ok(()) = stopped(&mut shutdown) => {
                log::info!("Sweep loop stopping");
                return;
            }
        }
    }
}
