//! Lifecycle reconciliation for a single cloud account.
//!
//! ## State machine
//!
//! ```text
//!            create ok                      delete ok
//! Absent ──► Creating ──► Present ──► Deleting ──► Absent
//!   ▲           │            │           │
//!   │ create err│  read 404  │  delete err (stays Present)
//!   └───────────┴────────────┘
//! ```
//!
//! ## Rules
//!
//! - Validation runs on the declared values before any request.
//! - A 404 on read means the object was removed out of band: the record is
//!   cleared and the read succeeds. A 404 on import is an error.
//! - Every other remote failure is surfaced as-is with the record untouched.
//!   Nothing is retried here.
//! - At most one operation runs per record at a time; the caller serializes.

use chrono::Utc;

use acctsync_core::{
    links, normalize, validate, CloudAccountConfig, CloudAccountId, CloudAccountRecord,
    NormalizeError, Tag,
};

use crate::api::{ApiError, CallOptions, CloudAccountApi, CreateSpec, RemoteAccount, RequestContext, UpdateSpec};
use crate::error::{Operation, ReconcileError};

/// Where the managed record sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Absent,
    Creating,
    Present,
    Deleting,
}

/// Outcome of a get-by-id against the remote side.
enum Fetch {
    Found,
    Gone,
}

/// Drives create / read / update / delete / import for one record.
///
/// The client handle is injected by the caller; the reconciler holds no
/// other shared state.
#[derive(Debug)]
pub struct Reconciler<C> {
    client: C,
    record: CloudAccountRecord,
    state: LifecycleState,
}

impl<C: CloudAccountApi> Reconciler<C> {
    /// A reconciler for an account that does not exist yet.
    pub fn new(client: C) -> Self {
        Self {
            client,
            record: CloudAccountRecord::default(),
            state: LifecycleState::Absent,
        }
    }

    /// Resume from a previously persisted record.
    pub fn with_record(client: C, record: CloudAccountRecord) -> Self {
        let state = if record.is_present() {
            LifecycleState::Present
        } else {
            LifecycleState::Absent
        };
        Self {
            client,
            record,
            state,
        }
    }

    pub fn record(&self) -> &CloudAccountRecord {
        &self.record
    }

    pub fn into_record(self) -> CloudAccountRecord {
        self.record
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    // -----------------------------------------------------------------------
    // Create
    // -----------------------------------------------------------------------

    /// Create the remote object from `config`, then refresh the record from it.
    pub fn create(
        &mut self,
        config: &CloudAccountConfig,
        ctx: &RequestContext,
    ) -> Result<&CloudAccountRecord, ReconcileError> {
        if let Some(id) = &self.record.id {
            return Err(ReconcileError::AlreadyPresent { id: id.clone() });
        }
        validate::validate_for_create(config)?;

        let spec = CreateSpec::from_config(config);
        self.state = LifecycleState::Creating;
        tracing::info!("creating cloud account '{}' on {}", config.name, config.hostname);

        let created = match self.client.create(&spec, &CallOptions::long_running(ctx)) {
            Ok(created) => created,
            Err(source) => {
                self.state = LifecycleState::Absent;
                return Err(ReconcileError::Remote {
                    operation: Operation::Create,
                    source,
                });
            }
        };

        // The id is kept from here on so a later failure cannot orphan the
        // remote object.
        let mut record = CloudAccountRecord::from_config(config);
        record.id = Some(CloudAccountId::from(created.id.clone()));
        self.record = record;
        self.state = LifecycleState::Present;
        tracing::info!("created cloud account '{}' (id {})", config.name, created.id);

        let created_links = links::flatten(&created.links);
        self.record.region_ids = normalize::normalize_from_links(&config.regions, &created_links)?;
        // Tags as submitted; the create response may not echo them.
        self.record.tags = config.tags.clone();

        self.refresh(ctx, Operation::Create)?;
        Ok(&self.record)
    }

    // -----------------------------------------------------------------------
    // Read
    // -----------------------------------------------------------------------

    /// Refresh every remote-derived field.
    ///
    /// A missing remote object is not an error: the record is cleared and the
    /// state becomes [`LifecycleState::Absent`].
    pub fn read(&mut self, ctx: &RequestContext) -> Result<&CloudAccountRecord, ReconcileError> {
        if self.record.id.is_none() {
            tracing::debug!("read skipped: cloud account '{}' is absent", self.record.name);
            return Ok(&self.record);
        }
        self.refresh(ctx, Operation::Read)?;
        Ok(&self.record)
    }

    fn refresh(&mut self, ctx: &RequestContext, operation: Operation) -> Result<(), ReconcileError> {
        match self.fetch(ctx, operation)? {
            Fetch::Found => Ok(()),
            Fetch::Gone => {
                tracing::warn!(
                    "cloud account '{}' no longer exists remotely; clearing local record",
                    self.record.name
                );
                self.record = CloudAccountRecord::default();
                self.state = LifecycleState::Absent;
                Ok(())
            }
        }
    }

    fn fetch(&mut self, ctx: &RequestContext, operation: Operation) -> Result<Fetch, ReconcileError> {
        let Some(id) = self.record.id.clone() else {
            return Err(ReconcileError::NotCreated { operation });
        };

        let remote = match self.client.get_by_id(&id, &CallOptions::standard(ctx)) {
            Ok(remote) => remote,
            Err(ApiError::NotFound { .. }) => return Ok(Fetch::Gone),
            Err(source) => return Err(ReconcileError::Remote { operation, source }),
        };

        apply_remote(&mut self.record, remote)?;
        self.state = LifecycleState::Present;
        tracing::debug!("refreshed cloud account '{}' (id {id})", self.record.name);
        Ok(Fetch::Found)
    }

    // -----------------------------------------------------------------------
    // Update
    // -----------------------------------------------------------------------

    /// Send the mutable fields (`description`, `regions`, `tags`), then refresh.
    pub fn update(
        &mut self,
        config: &CloudAccountConfig,
        ctx: &RequestContext,
    ) -> Result<&CloudAccountRecord, ReconcileError> {
        let Some(id) = self.record.id.clone() else {
            return Err(ReconcileError::NotCreated {
                operation: Operation::Update,
            });
        };
        validate::validate_for_update(config)?;

        let spec = UpdateSpec::from_config(config);
        tracing::info!("updating cloud account '{}' (id {id})", self.record.name);
        self.client
            .update(&id, &spec, &CallOptions::standard(ctx))
            .map_err(ReconcileError::remote(Operation::Update))?;

        self.record.description = config.description.clone();
        self.record.regions = config.regions.clone();
        self.record.tags = config.tags.clone();

        self.refresh(ctx, Operation::Update)?;
        Ok(&self.record)
    }

    // -----------------------------------------------------------------------
    // Delete
    // -----------------------------------------------------------------------

    /// Delete the remote object. On failure the record is left exactly as it was.
    pub fn delete(&mut self, ctx: &RequestContext) -> Result<&CloudAccountRecord, ReconcileError> {
        let Some(id) = self.record.id.clone() else {
            return Err(ReconcileError::NotCreated {
                operation: Operation::Delete,
            });
        };

        self.state = LifecycleState::Deleting;
        tracing::info!("deleting cloud account '{}' (id {id})", self.record.name);
        if let Err(source) = self.client.delete_by_id(&id, &CallOptions::standard(ctx)) {
            self.state = LifecycleState::Present;
            return Err(ReconcileError::Remote {
                operation: Operation::Delete,
                source,
            });
        }

        forget_remote(&mut self.record);
        self.state = LifecycleState::Absent;
        tracing::info!("deleted cloud account '{}'", self.record.name);
        Ok(&self.record)
    }

    // -----------------------------------------------------------------------
    // Import
    // -----------------------------------------------------------------------

    /// Adopt an existing remote object by id. Unlike [`Reconciler::read`], a
    /// missing object is an error here.
    pub fn import(
        &mut self,
        id: CloudAccountId,
        ctx: &RequestContext,
    ) -> Result<&CloudAccountRecord, ReconcileError> {
        if let Some(existing) = &self.record.id {
            return Err(ReconcileError::AlreadyPresent {
                id: existing.clone(),
            });
        }

        let name = self.record.name.clone();
        self.record = CloudAccountRecord::from_id(id.clone());
        self.record.name = name;
        tracing::info!("importing cloud account {id}");

        match self.fetch(ctx, Operation::Import) {
            Ok(Fetch::Found) => Ok(&self.record),
            Ok(Fetch::Gone) => {
                self.record = CloudAccountRecord::default();
                self.state = LifecycleState::Absent;
                Err(ReconcileError::ImportNotFound { id })
            }
            Err(err) => {
                self.record = CloudAccountRecord::default();
                self.state = LifecycleState::Absent;
                Err(err)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Field mapping
// ---------------------------------------------------------------------------

/// Overwrite the remote-derived fields of `record` from `remote`.
///
/// Everything fallible runs before the first write, so a malformed link
/// leaves `record` untouched. `password` and `accept_self_signed_cert` are
/// never echoed by the API and are left alone; `regions` keeps the declared
/// order and is only seeded from the remote side when empty (import).
fn apply_remote(record: &mut CloudAccountRecord, remote: RemoteAccount) -> Result<(), NormalizeError> {
    let flat = links::flatten(&remote.links);
    let declared = if record.regions.is_empty() {
        remote.enabled_region_ids.clone()
    } else {
        record.regions.clone()
    };
    let region_ids = normalize::normalize_from_links(&declared, &flat)?;
    let associated = links::associated_account_ids(&flat)?;

    if region_ids != declared {
        tracing::info!(
            "cloud account '{}' drifted: declared regions {:?}, remote enabled {:?}",
            record.name,
            declared,
            region_ids
        );
    }

    if record.name.0.is_empty() {
        record.name = remote.name.clone().into();
    }
    record.hostname = remote.host_name;
    record.username = remote.username;
    record.dcid = remote.dcid;
    record.description = remote.description.filter(|d| !d.is_empty());
    record.regions = declared;
    record.region_ids = region_ids;
    record.associated_cloud_account_ids = associated;
    if let Some(tags) = remote.tags {
        record.tags = sorted_tags(tags);
    }
    record.created_at = remote.created_at;
    record.updated_at = remote.updated_at;
    record.org_id = remote.org_id;
    record.owner = remote.owner;
    record.custom_properties = remote.custom_properties;
    record.links = flat;
    record.last_synced_at = Some(Utc::now());
    Ok(())
}

/// Drop the remote identity and every remote-computed field, keeping the
/// declared configuration.
fn forget_remote(record: &mut CloudAccountRecord) {
    record.id = None;
    record.region_ids.clear();
    record.created_at = None;
    record.updated_at = None;
    record.org_id = None;
    record.owner = None;
    record.custom_properties.clear();
    record.links.clear();
    record.last_synced_at = None;
}

fn sorted_tags(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort();
    tags
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use acctsync_core::{links::Href, AccountName, Password, RemoteLinks};

    use super::*;

    /// Answers every get with the same account and counts calls.
    struct StaticApi {
        account: RemoteAccount,
        gets: Cell<usize>,
    }

    impl CloudAccountApi for StaticApi {
        fn create(&self, _spec: &CreateSpec, _opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
            Ok(self.account.clone())
        }

        fn get_by_id(&self, _id: &CloudAccountId, _opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
            self.gets.set(self.gets.get() + 1);
            Ok(self.account.clone())
        }

        fn update(
            &self,
            _id: &CloudAccountId,
            _spec: &UpdateSpec,
            _opts: &CallOptions,
        ) -> Result<RemoteAccount, ApiError> {
            Ok(self.account.clone())
        }

        fn delete_by_id(&self, _id: &CloudAccountId, _opts: &CallOptions) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn account(regions: &[&str]) -> RemoteAccount {
        let mut links = RemoteLinks::new();
        links.insert(
            links::REL_REGIONS.to_string(),
            Href {
                href: None,
                hrefs: regions.iter().map(|r| format!("/iaas/api/regions/{r}")).collect(),
            },
        );
        RemoteAccount {
            id: "acct-1".to_string(),
            name: "lab-vc".to_string(),
            host_name: "vc.lab.local".to_string(),
            username: "admin".to_string(),
            enabled_region_ids: regions.iter().map(|r| r.to_string()).collect(),
            links,
            ..RemoteAccount::default()
        }
    }

    fn config(regions: &[&str]) -> CloudAccountConfig {
        CloudAccountConfig {
            name: AccountName::from("lab-vc"),
            hostname: "vc.lab.local".to_string(),
            username: "admin".to_string(),
            password: Password::new("pw"),
            regions: regions.iter().map(|r| r.to_string()).collect(),
            tags: vec![Tag::new("team", "infra")],
            ..CloudAccountConfig::default()
        }
    }

    #[test]
    fn new_reconciler_is_absent() {
        let api = StaticApi {
            account: account(&[]),
            gets: Cell::new(0),
        };
        let reconciler = Reconciler::new(&api);
        assert_eq!(reconciler.state(), LifecycleState::Absent);
        assert!(!reconciler.record().is_present());
    }

    #[test]
    fn with_record_derives_state_from_id() {
        let api = StaticApi {
            account: account(&[]),
            gets: Cell::new(0),
        };
        let record = CloudAccountRecord::from_id(CloudAccountId::from("acct-1"));
        assert_eq!(
            Reconciler::with_record(&api, record).state(),
            LifecycleState::Present
        );
    }

    #[test]
    fn create_refreshes_once_and_keeps_declared_order() {
        let api = StaticApi {
            account: account(&["r1", "r2"]),
            gets: Cell::new(0),
        };
        let mut reconciler = Reconciler::new(&api);
        let record = reconciler
            .create(&config(&["r2", "r1"]), &RequestContext::default())
            .expect("create");
        assert_eq!(record.region_ids, vec!["r2", "r1"]);
        assert_eq!(record.tags, vec![Tag::new("team", "infra")]);
        assert!(record.last_synced_at.is_some());
        assert_eq!(api.gets.get(), 1);
        assert_eq!(reconciler.state(), LifecycleState::Present);
    }

    #[test]
    fn read_on_absent_record_makes_no_call() {
        let api = StaticApi {
            account: account(&["r1"]),
            gets: Cell::new(0),
        };
        let mut reconciler = Reconciler::new(&api);
        reconciler.read(&RequestContext::default()).expect("read");
        assert_eq!(api.gets.get(), 0);
        assert_eq!(reconciler.state(), LifecycleState::Absent);
    }

    #[test]
    fn apply_remote_seeds_regions_when_empty() {
        let mut record = CloudAccountRecord::from_id(CloudAccountId::from("acct-1"));
        apply_remote(&mut record, account(&["r3", "r1"])).expect("apply");
        assert_eq!(record.regions, vec!["r3", "r1"]);
        assert_eq!(record.region_ids, vec!["r3", "r1"]);
        assert_eq!(record.name, AccountName::from("lab-vc"));
    }

    #[test]
    fn apply_remote_leaves_record_untouched_on_malformed_link() {
        let mut remote = account(&["r1"]);
        remote
            .links
            .entry(links::REL_REGIONS.to_string())
            .or_default()
            .hrefs
            .push("broken".to_string());
        remote.host_name = "elsewhere".to_string();

        let mut record = CloudAccountRecord::from_config(&config(&["r1"]));
        let before = record.clone();
        assert!(apply_remote(&mut record, remote).is_err());
        assert_eq!(record, before);
    }
}
