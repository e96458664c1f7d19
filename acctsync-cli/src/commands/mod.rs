pub mod create;
pub mod delete;
pub mod import;
pub mod read;
pub mod show;
pub mod update;

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Args;

use acctsync_core::{store, validate, AccountName, CloudAccountConfig, CloudAccountRecord, StoreError};
use acctsync_reconciler::RequestContext;

use crate::http::HttpCloudAccountApi;
use crate::settings;

/// Connection flags shared by every command that talks to the remote API.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Base URL of the management API (e.g. https://vra.example.com).
    #[arg(long, env = "ACCTSYNC_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Bearer token for the management API.
    #[arg(long, env = "ACCTSYNC_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Give up on the whole operation after this many seconds.
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,
}

impl RemoteArgs {
    pub fn client(&self, home: &Path) -> Result<HttpCloudAccountApi> {
        let file = settings::load_file_at(home)?;
        let resolved = settings::resolve(file, self.endpoint.clone(), self.token.clone())?;
        Ok(HttpCloudAccountApi::new(&resolved))
    }

    pub fn context(&self) -> RequestContext {
        match self.deadline_secs {
            Some(secs) => RequestContext::with_deadline(Instant::now() + Duration::from_secs(secs)),
            None => RequestContext::default(),
        }
    }
}

pub fn home() -> Result<PathBuf> {
    dirs::home_dir().context("could not determine home directory")
}

pub fn load_config(path: &Path) -> Result<CloudAccountConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read config '{}'", path.display()))?;
    let config: CloudAccountConfig = serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse config '{}'", path.display()))?;
    validate::validate_name(&config.name)
        .with_context(|| format!("invalid config '{}'", path.display()))?;
    Ok(config)
}

/// An account name from the command line, checked before it touches the store.
pub fn account_name(raw: String) -> Result<AccountName> {
    let name = AccountName::from(raw);
    validate::validate_name(&name)?;
    Ok(name)
}

/// The stored record for `name`, or an absent record carrying just the name.
pub fn load_or_absent(home: &Path, name: &AccountName) -> Result<CloudAccountRecord> {
    match store::load_record_at(home, name) {
        Ok(record) => Ok(record),
        Err(StoreError::RecordNotFound { .. }) => Ok(CloudAccountRecord {
            name: name.clone(),
            ..CloudAccountRecord::default()
        }),
        Err(err) => Err(err).with_context(|| format!("failed to load local record for '{name}'")),
    }
}

/// The stored record for `name`; missing records are an error.
pub fn load_existing(home: &Path, name: &AccountName) -> Result<CloudAccountRecord> {
    store::load_record_at(home, name).with_context(|| {
        format!("'{name}' is not managed here; run `acctsync create` or `acctsync import` first")
    })
}

/// Save a present record, or drop the file once the account is absent.
pub fn persist(home: &Path, name: &AccountName, record: &CloudAccountRecord) -> Result<()> {
    if record.is_present() {
        store::save_record_at(home, record)
            .with_context(|| format!("failed to save local record for '{name}'"))?;
    } else {
        store::remove_record_at(home, name)
            .with_context(|| format!("failed to remove local record for '{name}'"))?;
    }
    Ok(())
}
