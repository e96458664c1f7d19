//! `acctsync delete <name>` — remove the remote account and its local record.

use anyhow::{Context, Result};
use clap::Args;

use acctsync_reconciler::Reconciler;

use super::{account_name, home, load_existing, persist, RemoteArgs};

/// Arguments for `acctsync delete`.
#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Name of the managed account.
    pub name: String,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl DeleteArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let name = account_name(self.name)?;
        let record = load_existing(&home, &name)?;

        let client = self.remote.client(&home)?;
        let mut reconciler = Reconciler::with_record(client, record);
        reconciler
            .delete(&self.remote.context())
            .with_context(|| format!("delete failed for '{name}'"))?;
        persist(&home, &name, reconciler.record())?;

        println!("✓ Deleted '{name}'");
        Ok(())
    }
}
