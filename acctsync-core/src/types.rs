//! Domain types for managed vSphere cloud accounts.
//!
//! [`CloudAccountConfig`] is what the user declares; [`CloudAccountRecord`] is
//! the local record kept consistent with the remote object. Both are
//! serializable via serde + serde_yaml.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::links::Link;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Remote identifier of a cloud account, assigned by the API on creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CloudAccountId(pub String);

impl fmt::Display for CloudAccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for CloudAccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CloudAccountId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Local name of a managed account; keys the on-disk record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountName(pub String);

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for AccountName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AccountName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Write-only credential. `Debug` and `Display` never print the value.
#[derive(Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The raw secret, for building the create request only.
    pub fn expose(&self) -> &str {
        &self.0
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(****)")
    }
}

impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

/// A key/value tag attached to the remote object.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Declared configuration
// ---------------------------------------------------------------------------

/// Desired state of a cloud account as authored by the user.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CloudAccountConfig {
    pub name: AccountName,
    pub hostname: String,
    pub username: String,
    pub password: Password,
    /// Declared order is preserved; values must be unique.
    pub regions: Vec<String>,
    #[serde(default)]
    pub associated_cloud_account_ids: Vec<String>,
    #[serde(default)]
    pub accept_self_signed_cert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

// ---------------------------------------------------------------------------
// Managed record
// ---------------------------------------------------------------------------

/// Local record of a managed cloud account.
///
/// `id` is `None` exactly while the account is absent remotely (never
/// created, deleted, or found missing on refresh).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CloudAccountRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CloudAccountId>,
    pub name: AccountName,
    pub hostname: String,
    pub username: String,
    /// Never persisted and never refreshed from the remote side.
    #[serde(skip_serializing, default)]
    pub password: Password,
    #[serde(default)]
    pub regions: Vec<String>,
    /// Remote-confirmed enabled regions, ordered to follow `regions`.
    #[serde(default)]
    pub region_ids: Vec<String>,
    #[serde(default)]
    pub associated_cloud_account_ids: Vec<String>,
    #[serde(default)]
    pub accept_self_signed_cert: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,

    // Remote-computed, read-only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub custom_properties: BTreeMap<String, String>,
    #[serde(default)]
    pub links: Vec<Link>,

    /// When the record was last refreshed from the remote side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl CloudAccountRecord {
    /// Build a not-yet-created record from declared configuration.
    pub fn from_config(config: &CloudAccountConfig) -> Self {
        Self {
            name: config.name.clone(),
            hostname: config.hostname.clone(),
            username: config.username.clone(),
            password: config.password.clone(),
            regions: config.regions.clone(),
            associated_cloud_account_ids: config.associated_cloud_account_ids.clone(),
            accept_self_signed_cert: config.accept_self_signed_cert,
            dcid: config.dcid.clone(),
            description: config.description.clone(),
            tags: config.tags.clone(),
            ..Self::default()
        }
    }

    /// A record carrying only a remote id; everything else comes from the first refresh.
    pub fn from_id(id: CloudAccountId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn is_present(&self) -> bool {
        self.id.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
