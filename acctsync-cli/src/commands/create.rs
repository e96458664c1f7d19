//! `acctsync create <config.yaml>` — register a new cloud account.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use acctsync_reconciler::Reconciler;

use super::{home, load_config, load_or_absent, persist, RemoteArgs};

/// Arguments for `acctsync create`.
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Path to the account's YAML configuration.
    pub config: PathBuf,

    #[command(flatten)]
    pub remote: RemoteArgs,
}

impl CreateArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let config = load_config(&self.config)?;
        let existing = load_or_absent(&home, &config.name)?;

        let client = self.remote.client(&home)?;
        let mut reconciler = Reconciler::with_record(client, existing);
        let outcome = reconciler.create(&config, &self.remote.context()).map(|_| ());

        // Persist even on failure: a create that got an id must not lose it.
        persist(&home, &config.name, reconciler.record())?;
        outcome.with_context(|| format!("create failed for '{}'", config.name))?;

        let record = reconciler.record();
        let id = record.id.as_ref().map(|id| id.0.as_str()).unwrap_or("-");
        println!("✓ Created '{}' (id {id})", config.name);
        println!("  regions: {}", record.region_ids.join(", "));
        Ok(())
    }
}
