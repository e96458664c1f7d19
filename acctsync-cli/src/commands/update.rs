//! `acctsync update <config.yaml>` — push description, regions and tags.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use acctsync_reconciler::{LifecycleState, Reconciler};

use super::{home, load_config, load_existing, persist, RemoteArgs};

/// Arguments for `acctsync update`.
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Path to the account's YAML configuration.
    pub config: PathBuf,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl UpdateArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let config = load_config(&self.config)?;
        let record = load_existing(&home, &config.name)?;

        let client = self.remote.client(&home)?;
        let mut reconciler = Reconciler::with_record(client, record);
        let outcome = reconciler.update(&config, &self.remote.context()).map(|_| ());

        // The remote may have accepted the change even if the refresh failed.
        persist(&home, &config.name, reconciler.record())?;
        outcome.with_context(|| format!("update failed for '{}'", config.name))?;

        if reconciler.state() == LifecycleState::Absent {
            println!("! '{}' vanished remotely during update; local record removed", config.name);
            return Ok(());
        }
        println!("✓ Updated '{}'", config.name);
        println!("  regions: {}", reconciler.record().region_ids.join(", "));
        Ok(())
    }
}
