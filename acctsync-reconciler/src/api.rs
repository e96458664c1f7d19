//! Remote control-plane boundary.
//!
//! [`CloudAccountApi`] is the blocking client the reconciler talks to. The
//! request and response shapes mirror the IaaS API's vSphere cloud-account
//! JSON (camelCase keys, `_links` for relations).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use acctsync_core::{CloudAccountConfig, CloudAccountId, Password, RemoteLinks, Tag};

/// Timeout for the create call; remote provisioning is slow.
pub const CREATE_TIMEOUT: Duration = Duration::from_secs(60);
/// Timeout for every other call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Call options
// ---------------------------------------------------------------------------

/// Caller-owned deadline, passed through to every request unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub deadline: Option<Instant>,
}

impl RequestContext {
    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }
}

/// Per-request options handed to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallOptions {
    pub timeout: Duration,
    pub deadline: Option<Instant>,
}

impl CallOptions {
    pub fn standard(ctx: &RequestContext) -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            deadline: ctx.deadline,
        }
    }

    pub fn long_running(ctx: &RequestContext) -> Self {
        Self {
            timeout: CREATE_TIMEOUT,
            deadline: ctx.deadline,
        }
    }

    /// Timeout clamped to the caller's deadline; `None` once the deadline has passed.
    pub fn effective_timeout(&self, now: Instant) -> Option<Duration> {
        match self.deadline {
            None => Some(self.timeout),
            Some(deadline) => {
                let left = deadline.checked_duration_since(now)?;
                if left.is_zero() {
                    None
                } else {
                    Some(left.min(self.timeout))
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Request / response shapes
// ---------------------------------------------------------------------------

/// Body of the create request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSpec {
    pub name: String,
    pub host_name: String,
    pub username: String,
    pub password: Password,
    pub region_ids: Vec<String>,
    pub associated_cloud_account_ids: Vec<String>,
    pub accept_self_signed_certificate: bool,
    pub create_default_zones: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dcid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<Tag>,
}

impl CreateSpec {
    pub fn from_config(config: &CloudAccountConfig) -> Self {
        Self {
            name: config.name.0.clone(),
            host_name: config.hostname.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            region_ids: config.regions.clone(),
            associated_cloud_account_ids: config.associated_cloud_account_ids.clone(),
            accept_self_signed_certificate: config.accept_self_signed_cert,
            create_default_zones: false,
            dcid: config.dcid.clone(),
            description: config.description.clone(),
            tags: config.tags.clone(),
        }
    }
}

/// Body of the update request. Only these fields are mutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSpec {
    /// Always sent; an empty string clears the remote description.
    pub description: String,
    pub region_ids: Vec<String>,
    pub tags: Vec<Tag>,
    pub create_default_zones: bool,
}

impl UpdateSpec {
    pub fn from_config(config: &CloudAccountConfig) -> Self {
        Self {
            description: config.description.clone().unwrap_or_default(),
            region_ids: config.regions.clone(),
            tags: config.tags.clone(),
            create_default_zones: false,
        }
    }
}

/// A vSphere cloud account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAccount {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub host_name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub dcid: Option<String>,
    #[serde(default)]
    pub enabled_region_ids: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub custom_properties: BTreeMap<String, String>,
    /// `None` when the API leaves tags out of the response.
    #[serde(default)]
    pub tags: Option<Vec<Tag>>,
    #[serde(default, rename = "_links")]
    pub links: RemoteLinks,
}

// ---------------------------------------------------------------------------
// Client trait
// ---------------------------------------------------------------------------

/// Failures reported by a [`CloudAccountApi`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The remote object does not exist.
    #[error("cloud account {id} not found")]
    NotFound { id: String },

    /// Any other non-success HTTP status.
    #[error("remote API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Connection, TLS, or timeout failure below the HTTP layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The caller's deadline passed before the request could be sent.
    #[error("deadline exceeded before the request was sent")]
    DeadlineExceeded,
}

/// Blocking client for the vSphere cloud-account endpoints.
pub trait CloudAccountApi {
    fn create(&self, spec: &CreateSpec, opts: &CallOptions) -> Result<RemoteAccount, ApiError>;

    fn get_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<RemoteAccount, ApiError>;

    fn update(
        &self,
        id: &CloudAccountId,
        spec: &UpdateSpec,
        opts: &CallOptions,
    ) -> Result<RemoteAccount, ApiError>;

    fn delete_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<(), ApiError>;
}

impl<T: CloudAccountApi + ?Sized> CloudAccountApi for &T {
    fn create(&self, spec: &CreateSpec, opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
        (**self).create(spec, opts)
    }

    fn get_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
        (**self).get_by_id(id, opts)
    }

    fn update(
        &self,
        id: &CloudAccountId,
        spec: &UpdateSpec,
        opts: &CallOptions,
    ) -> Result<RemoteAccount, ApiError> {
        (**self).update(id, spec, opts)
    }

    fn delete_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<(), ApiError> {
        (**self).delete_by_id(id, opts)
    }
}
