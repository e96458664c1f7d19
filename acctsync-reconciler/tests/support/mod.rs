//! In-memory remote API that records every call.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use acctsync_core::{links::Href, AccountName, CloudAccountConfig, CloudAccountId, Password, RemoteLinks, Tag};
use acctsync_reconciler::{ApiError, CallOptions, CloudAccountApi, CreateSpec, RemoteAccount, UpdateSpec};

/// One observed client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(CallOptions),
    Get(CloudAccountId, CallOptions),
    Update(CloudAccountId, UpdateSpec),
    Delete(CloudAccountId),
}

/// Accounts live in a map; tests can queue failures per call kind and
/// choose the order in which region links come back.
#[derive(Default)]
pub struct FakeApi {
    pub accounts: RefCell<BTreeMap<String, RemoteAccount>>,
    pub calls: RefCell<Vec<Call>>,
    pub create_errors: RefCell<VecDeque<ApiError>>,
    pub get_errors: RefCell<VecDeque<ApiError>>,
    pub update_errors: RefCell<VecDeque<ApiError>>,
    pub delete_errors: RefCell<VecDeque<ApiError>>,
    /// Region order the fake answers with; `None` keeps request order.
    pub remote_region_order: RefCell<Option<Vec<String>>>,
    /// Extra region links attached to every response.
    pub extra_regions: RefCell<Vec<String>>,
    /// Echo tags on reads.
    pub echo_tags: bool,
    next_id: RefCell<u32>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            echo_tags: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn answer_regions_in(&self, order: &[&str]) {
        *self.remote_region_order.borrow_mut() = Some(order.iter().map(|s| s.to_string()).collect());
    }

    pub fn insert(&self, account: RemoteAccount) {
        self.accounts.borrow_mut().insert(account.id.clone(), account);
    }

    pub fn remove(&self, id: &str) {
        self.accounts.borrow_mut().remove(id);
    }

    fn render(&self, account: &RemoteAccount) -> RemoteAccount {
        let mut out = account.clone();
        let mut regions = match self.remote_region_order.borrow().as_ref() {
            Some(order) => order.clone(),
            None => account.enabled_region_ids.clone(),
        };
        regions.extend(self.extra_regions.borrow().iter().cloned());
        out.enabled_region_ids = regions.clone();
        out.links.insert(
            "regions".to_string(),
            Href {
                href: None,
                hrefs: regions.iter().map(|r| format!("/iaas/api/regions/{r}")).collect(),
            },
        );
        if !self.echo_tags {
            out.tags = None;
        }
        out
    }
}

impl CloudAccountApi for FakeApi {
    fn create(&self, spec: &CreateSpec, opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
        self.calls.borrow_mut().push(Call::Create(*opts));
        if let Some(err) = self.create_errors.borrow_mut().pop_front() {
            return Err(err);
        }
        let id = {
            let mut next = self.next_id.borrow_mut();
            *next += 1;
            format!("acct-{}", *next)
        };
        let mut links = RemoteLinks::new();
        links.insert(
            "associated-cloud-accounts".to_string(),
            Href {
                href: None,
                hrefs: spec
                    .associated_cloud_account_ids
                    .iter()
                    .map(|a| format!("/iaas/api/cloud-accounts/{a}"))
                    .collect(),
            },
        );
        let account = RemoteAccount {
            id: id.clone(),
            name: spec.name.clone(),
            description: spec.description.clone(),
            host_name: spec.host_name.clone(),
            username: spec.username.clone(),
            dcid: spec.dcid.clone(),
            enabled_region_ids: spec.region_ids.clone(),
            created_at: Some("2026-10-18".to_string()),
            updated_at: Some("2026-10-18".to_string()),
            org_id: Some("org-1".to_string()),
            owner: Some("admin@corp".to_string()),
            custom_properties: BTreeMap::new(),
            tags: Some(spec.tags.clone()),
            links,
        };
        self.insert(account.clone());
        Ok(self.render(&account))
    }

    fn get_by_id(&self, id: &CloudAccountId, opts: &CallOptions) -> Result<RemoteAccount, ApiError> {
        self.calls.borrow_mut().push(Call::Get(id.clone(), *opts));
        if let Some(err) = self.get_errors.borrow_mut().pop_front() {
            return Err(err);
        }
        match self.accounts.borrow().get(&id.0) {
            Some(account) => Ok(self.render(account)),
            None => Err(ApiError::NotFound { id: id.0.clone() }),
        }
    }

    fn update(
        &self,
        id: &CloudAccountId,
        spec: &UpdateSpec,
        _opts: &CallOptions,
    ) -> Result<RemoteAccount, ApiError> {
        self.calls.borrow_mut().push(Call::Update(id.clone(), spec.clone()));
        if let Some(err) = self.update_errors.borrow_mut().pop_front() {
            return Err(err);
        }
        let mut accounts = self.accounts.borrow_mut();
        let Some(account) = accounts.get_mut(&id.0) else {
            return Err(ApiError::NotFound { id: id.0.clone() });
        };
        // PATCH semantics: a field left out of the body keeps its old value.
        if let Some(description) = spec_field(spec, "description") {
            account.description = Some(description).filter(|d| !d.is_empty());
        }
        account.enabled_region_ids = spec.region_ids.clone();
        account.tags = Some(spec.tags.clone());
        let snapshot = account.clone();
        drop(accounts);
        Ok(self.render(&snapshot))
    }

    fn delete_by_id(&self, id: &CloudAccountId, _opts: &CallOptions) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(Call::Delete(id.clone()));
        if let Some(err) = self.delete_errors.borrow_mut().pop_front() {
            return Err(err);
        }
        match self.accounts.borrow_mut().remove(&id.0) {
            Some(_) => Ok(()),
            None => Err(ApiError::NotFound { id: id.0.clone() }),
        }
    }
}

/// The string value of `field` in the serialized update body, if present.
fn spec_field(spec: &UpdateSpec, field: &str) -> Option<String> {
    let body = serde_json::to_value(spec).ok()?;
    body.get(field)?.as_str().map(str::to_string)
}

pub fn config(regions: &[&str]) -> CloudAccountConfig {
    CloudAccountConfig {
        name: AccountName::from("lab-vc"),
        hostname: "vc.lab.local".to_string(),
        username: "administrator@vsphere.local".to_string(),
        password: Password::new("hunter2"),
        regions: regions.iter().map(|r| r.to_string()).collect(),
        description: Some("lab vCenter".to_string()),
        tags: vec![Tag::new("env", "lab")],
        ..CloudAccountConfig::default()
    }
}

pub fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "internal error".to_string(),
    }
}
