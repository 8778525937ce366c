//! Error types for the validation path.
//!
//! None of these are fatal: the dispatcher and sweep log them and move on.

use super::types::WorkloadKind;

#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The accessor cannot interpret the object for its kind.
    #[error("unsupported shape for {kind} '{name}': {reason}")]
    UnsupportedShape {
        kind: WorkloadKind,
        name: String,
        reason: String,
    },

    /// A live event arrived without an object to evaluate.
    #[error("no object supplied for live {0} event")]
    MissingObject(WorkloadKind),

    /// The event identity names a different kind than the object carries.
    #[error("identity kind {identity} does not match object kind {object}")]
    KindMismatch {
        identity: WorkloadKind,
        object: WorkloadKind,
    },

    #[error("failed to list {kind}: {source}")]
    Listing {
        kind: WorkloadKind,
        #[source]
        source: kube::Error,
    },

    #[error("listing {0} was cancelled")]
    Cancelled(WorkloadKind),

    #[error("listing {0} timed out")]
    Timeout(WorkloadKind),
}

impl ValidationError {
    pub fn unsupported_shape(
        kind: WorkloadKind,
        name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnsupportedShape {
            kind,
            name: name.into(),
            reason: reason.into(),
        }
    }
}
