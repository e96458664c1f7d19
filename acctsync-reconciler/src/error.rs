//! Error types for acctsync-reconciler.

use std::fmt;

use thiserror::Error;

use acctsync_core::{CloudAccountId, NormalizeError, ValidationError};

use crate::api::ApiError;

/// Lifecycle operation, used to label errors and log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Create,
    Read,
    Update,
    Delete,
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
            Operation::Update => write!(f, "update"),
            Operation::Delete => write!(f, "delete"),
            Operation::Import => write!(f, "import"),
        }
    }
}

/// All errors a lifecycle operation can surface.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Declared input rejected locally; nothing was sent.
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// The remote side returned link data that cannot be interpreted.
    #[error("remote data integrity error: {0}")]
    Normalize(#[from] NormalizeError),

    /// Import was asked for an id the remote side does not know.
    #[error("cannot import cloud account {id}: not found")]
    ImportNotFound { id: CloudAccountId },

    /// Any remote failure other than the not-found cases handled above.
    #[error("{operation} failed: {source}")]
    Remote {
        operation: Operation,
        #[source]
        source: ApiError,
    },

    /// Create or import on a record that already has a remote id.
    #[error("cloud account is already managed (id {id})")]
    AlreadyPresent { id: CloudAccountId },

    /// Update or delete on a record that was never created.
    #[error("cannot {operation}: cloud account has not been created")]
    NotCreated { operation: Operation },
}

impl ReconcileError {
    pub(crate) fn remote(operation: Operation) -> impl FnOnce(ApiError) -> Self {
        move |source| ReconcileError::Remote { operation, source }
    }
}
