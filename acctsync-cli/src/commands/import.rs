//! `acctsync import <name> <id>` — adopt an existing remote account.

use anyhow::{Context, Result};
use clap::Args;

use acctsync_core::CloudAccountId;
use acctsync_reconciler::Reconciler;

use super::{account_name, home, load_or_absent, persist, RemoteArgs};

/// Arguments for `acctsync import`.
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Local name to manage the account under.
    pub name: String,

    /// Remote cloud account id.
    pub id: String,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl ImportArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let name = account_name(self.name)?;
        let existing = load_or_absent(&home, &name)?;

        let client = self.remote.client(&home)?;
        let mut reconciler = Reconciler::with_record(client, existing);
        let outcome = reconciler
            .import(CloudAccountId::from(self.id.clone()), &self.remote.context())
            .map(|_| ());
        persist(&home, &name, reconciler.record())?;
        outcome.with_context(|| format!("import of {} as '{name}' failed", self.id))?;

        let record = reconciler.record();
        println!("✓ Imported '{name}' (id {})", self.id);
        println!("  hostname: {}", record.hostname);
        println!("  regions: {}", record.region_ids.join(", "));
        Ok(())
    }
}
