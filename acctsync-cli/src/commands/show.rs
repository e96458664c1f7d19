//! `acctsync show` / `acctsync list` — local views of managed accounts.
//!
//! Neither command contacts the remote API.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use acctsync_core::{store, CloudAccountRecord, Tag};

use super::{account_name, home, load_existing};

/// Arguments for `acctsync show`.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Name of the managed account.
    pub name: String,

    /// Emit the record as JSON.
    #[arg(long)]
    pub json: bool,
}

impl ShowArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let record = load_existing(&home, &account_name(self.name)?)?;

        if self.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&record).context("failed to serialize record JSON")?
            );
            return Ok(());
        }

        println!("{} {}", record.name.0.bold(), state_label(&record));
        let mut table = Table::new(field_rows(&record));
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

/// Arguments for `acctsync list`.
#[derive(Args, Debug)]
pub struct ListArgs {}

impl ListArgs {
    pub fn run(self) -> Result<()> {
        let home = home()?;
        let records = store::list_records_at(&home).context("failed to list local records")?;
        if records.is_empty() {
            println!("No cloud accounts managed.");
            return Ok(());
        }

        let rows: Vec<ListRow> = records
            .iter()
            .map(|record| ListRow {
                name: record.name.0.clone(),
                id: display_id(record),
                hostname: record.hostname.clone(),
                regions: record.region_ids.join(", "),
                last_synced: display_synced(record),
            })
            .collect();
        let mut table = Table::new(rows);
        table.with(Style::rounded());
        println!("{table}");
        Ok(())
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "field")]
    field: &'static str,
    #[tabled(rename = "value")]
    value: String,
}

#[derive(Tabled)]
struct ListRow {
    #[tabled(rename = "name")]
    name: String,
    #[tabled(rename = "id")]
    id: String,
    #[tabled(rename = "hostname")]
    hostname: String,
    #[tabled(rename = "regions")]
    regions: String,
    #[tabled(rename = "last synced")]
    last_synced: String,
}

fn state_label(record: &CloudAccountRecord) -> String {
    if record.is_present() {
        "PRESENT".green().to_string()
    } else {
        "ABSENT".yellow().to_string()
    }
}

fn display_id(record: &CloudAccountRecord) -> String {
    record
        .id
        .as_ref()
        .map(|id| id.0.clone())
        .unwrap_or_else(|| "-".to_string())
}

fn display_synced(record: &CloudAccountRecord) -> String {
    record
        .last_synced_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "never".to_string())
}

fn display_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| format!("{}={}", tag.key, tag.value))
        .collect::<Vec<_>>()
        .join(", ")
}

fn field_rows(record: &CloudAccountRecord) -> Vec<FieldRow> {
    let optional = |value: &Option<String>| value.clone().unwrap_or_default();
    vec![
        FieldRow { field: "id", value: display_id(record) },
        FieldRow { field: "hostname", value: record.hostname.clone() },
        FieldRow { field: "username", value: record.username.clone() },
        FieldRow { field: "regions", value: record.regions.join(", ") },
        FieldRow { field: "region ids", value: record.region_ids.join(", ") },
        FieldRow {
            field: "associated accounts",
            value: record.associated_cloud_account_ids.join(", "),
        },
        FieldRow {
            field: "self-signed cert",
            value: record.accept_self_signed_cert.to_string(),
        },
        FieldRow { field: "dcid", value: optional(&record.dcid) },
        FieldRow { field: "description", value: optional(&record.description) },
        FieldRow { field: "tags", value: display_tags(&record.tags) },
        FieldRow { field: "org", value: optional(&record.org_id) },
        FieldRow { field: "owner", value: optional(&record.owner) },
        FieldRow { field: "created", value: optional(&record.created_at) },
        FieldRow { field: "updated", value: optional(&record.updated_at) },
        FieldRow { field: "last synced", value: display_synced(record) },
    ]
}
