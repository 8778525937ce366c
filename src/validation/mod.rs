//! Workload compliance engine.
//!
//! Inspects workload objects against registered rules and exports the
//! pass/fail state of each resource as a Prometheus gauge keyed by
//! `{namespace, name, kind}`.
//!
//! # Architecture
//!
//! ```text
//!   watcher events ──┐                         ┌──> rule A ──> gauge A
//!                    ├──> Dispatcher ──(kind)──┤
//!   periodic sweep ──┘        │                └──> rule B ──> gauge B
//!                             ▼
//!                      ResourceAccessor
//!                   (Workload -> Snapshot)
//! ```
//!
//! Events arrive one at a time per identity from the kube watchers in
//! [`watch`]. Sweeps in [`sweep`] list every live instance of every kind a
//! rule declares and run them through the same evaluation path.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use workload_compliance::validation::{
//!     Dispatcher, KubeAccessor, MetricsRegistry, ValidationRegistry, rules,
//! };
//!
//! let metrics = MetricsRegistry::new();
//! let mut builder = ValidationRegistry::builder();
//! rules::register_builtin(&mut builder, &metrics);
//!
//! let dispatcher = Dispatcher::new(Arc::new(builder.build()), Arc::new(KubeAccessor));
//! dispatcher.on_apply(&workload);
//! println!("{}", metrics.encode_text()?);
//! ```

pub mod accessor;
pub mod dispatch;
pub mod error;
pub mod lister;
pub mod metrics;
pub mod quantity;
pub mod registry;
pub mod rule;
pub mod rules;
pub mod sweep;
pub mod types;
pub mod watch;
pub mod workload;

pub use accessor::{KubeAccessor, ResourceAccessor};
pub use dispatch::Dispatcher;
pub use error::ValidationError;
pub use lister::{KubeLister, ListScope, WorkloadLister};
pub use metrics::{ComplianceMetricSink, GaugeSink, MetricsError, MetricsRegistry};
pub use registry::{RegistryBuilder, ValidationRegistry};
pub use rule::{ObjectState, ValidationRule};
pub use sweep::{SweepContext, run_sweeps};
pub use types::{ContainerResourceSpec, ResourceIdentity, Verdict, WorkloadKind, WorkloadSnapshot};
pub use workload::Workload;
