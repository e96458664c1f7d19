//! # acctsync-reconciler
//!
//! Create / read / update / delete / import for a vSphere cloud account
//! against an injected [`CloudAccountApi`] client.
//!
//! Build a [`Reconciler`] around a client handle, then call one lifecycle
//! operation at a time. Each returns the record's post-operation state or a
//! [`ReconcileError`].

pub mod api;
pub mod error;
pub mod reconciler;

pub use api::{
    ApiError, CallOptions, CloudAccountApi, CreateSpec, RemoteAccount, RequestContext, UpdateSpec,
    CREATE_TIMEOUT, DEFAULT_TIMEOUT,
};
pub use error::{Operation, ReconcileError};
pub use reconciler::{LifecycleState, Reconciler};
