//! `acctsync read <name>` — refresh a managed account and detect drift.

use anyhow::{Context, Result};
use clap::Args;

use acctsync_reconciler::{LifecycleState, Reconciler};

use super::{account_name, home, load_existing, persist, RemoteArgs};

/// Arguments for `acctsync read`.
#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Name of the managed account.
    pub name: String,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl ReadArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let name = account_name(self.name)?;
        let record = load_existing(&home, &name)?;

        let client = self.remote.client(&home)?;
        let mut reconciler = Reconciler::with_record(client, record);
        reconciler
            .read(&self.remote.context())
            .with_context(|| format!("read failed for '{name}'"))?;
        persist(&home, &name, reconciler.record())?;

        if reconciler.state() == LifecycleState::Absent {
            println!("! '{name}' no longer exists remotely; local record removed");
            return Ok(());
        }

        let record = reconciler.record();
        println!("✓ Refreshed '{name}'");
        println!("  regions: {}", record.region_ids.join(", "));
        if !record.associated_cloud_account_ids.is_empty() {
            println!(
                "  associated accounts: {}",
                record.associated_cloud_account_ids.join(", ")
            );
        }
        Ok(())
    }
}
