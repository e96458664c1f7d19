//! acctsync — vSphere cloud-account lifecycle CLI.
//!
//! # Usage
//!
//! ```text
//! acctsync create <config.yaml>
//! acctsync read <name>
//! acctsync update <config.yaml>
//! acctsync delete <name>
//! acctsync import <name> <id>
//! acctsync show <name> [--json]
//! acctsync list
//! ```
//!
//! Remote commands accept `--endpoint` / `--token` (or `ACCTSYNC_ENDPOINT` /
//! `ACCTSYNC_TOKEN`) and `--deadline-secs`.

mod commands;
mod http;
mod settings;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    create::CreateArgs, delete::DeleteArgs, import::ImportArgs, read::ReadArgs, show::ListArgs,
    show::ShowArgs, update::UpdateArgs,
};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "acctsync",
    version,
    about = "Keep vSphere cloud-account registrations in sync with a declared configuration",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the cloud account described by a config file.
    Create(CreateArgs),

    /// Refresh a managed account from the remote API.
    Read(ReadArgs),

    /// Push description, regions and tags from a config file.
    Update(UpdateArgs),

    /// Delete a managed account remotely and forget it locally.
    Delete(DeleteArgs),

    /// Start managing an existing remote account by id.
    Import(ImportArgs),

    /// Print a managed account's local record.
    Show(ShowArgs),

    /// List all managed accounts.
    List(ListArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Create(args) => args.run(),
        Commands::Read(args) => args.run(),
        Commands::Update(args) => args.run(),
        Commands::Delete(args) => args.run(),
        Commands::Import(args) => args.run(),
        Commands::Show(args) => args.run(),
        Commands::List(args) => args.run(),
    }
}

fn init_tracing() {
    use std::io::IsTerminal;
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}
