// Label management commands
//
// List, edit, import, export and share the organization's local address
// labels.

use crate::commands::common;
use anyhow::{Context, Result};
use clap::Subcommand;
use quorum_core::QuorumConfig;
use quorum_identity::{
    export_file_name, export_json, parse_label_entries, IdentityRecord, LabelEntry, SharedLabels,
};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Subcommand)]
pub enum LabelsCommand {
    /// List every label, sorted by name
    List,

    /// Set the label of an address (an empty name removes it)
    Set {
        /// Address to label
        address: String,

        /// Label text
        name: String,
    },

    /// Remove the label of an address
    Remove {
        /// Address to unlabel
        address: String,
    },

    /// Import labels from an exported JSON file
    Import {
        /// File to import
        file: PathBuf,
    },

    /// Export labels to `<organization>_<date>.json`
    Export {
        /// Output directory
        #[arg(short, long, default_value = ".")]
        out: PathBuf,

        /// Addresses to export (all when omitted)
        addresses: Vec<String>,
    },

    /// Print a share link carrying labels
    Share {
        /// Addresses to share (all when omitted)
        addresses: Vec<String>,
    },

    /// Save labels received through a share link
    Receive {
        /// The share link
        link: String,

        /// Addresses from the link to leave out
        #[arg(long)]
        skip: Vec<String>,
    },

    /// Remove every label of the organization
    Clear {
        /// Confirm
        #[arg(long)]
        yes: bool,
    },
}

/// Run a labels command against the organization directory.
pub async fn handle_labels_command(command: LabelsCommand, config: &QuorumConfig) -> Result<()> {
    let directory = common::open_directory(config).await?;

    match command {
        LabelsCommand::List => {
            let records = directory.all();
            if records.is_empty() {
                println!("No labels for {}", config.organization_label());
            }
            for record in records {
                println!("{}  {}", record.address, record.name);
            }
        }

        LabelsCommand::Set { address, name } => {
            let address = common::parse_address(&address)?;
            directory.modify(address, &name).await?;
            info!(%address, "Label updated");
        }

        LabelsCommand::Remove { address } => {
            let address = common::parse_address(&address)?;
            directory.modify(address, "").await?;
            info!(%address, "Label removed");
        }

        LabelsCommand::Import { file } => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("reading {}", file.display()))?;
            let entries = parse_label_entries(&content)?;
            let count = directory.import_many(entries).await?;
            println!("Imported {count} labels");
        }

        LabelsCommand::Export { out, addresses } => {
            let entries = if addresses.is_empty() {
                directory.all().iter().map(IdentityRecord::to_entry).collect()
            } else {
                directory.export_selected(&common::parse_addresses(&addresses)?)
            };
            let path = write_export(&out, &config.organization_label(), &entries).await?;
            println!("Exported {} labels to {}", entries.len(), path.display());
        }

        LabelsCommand::Share { addresses } => {
            let addresses = if addresses.is_empty() {
                directory.all().iter().map(|r| r.address).collect()
            } else {
                common::parse_addresses(&addresses)?
            };
            println!("{}", directory.build_share_link(&config.share_base_url, &addresses)?);
        }

        LabelsCommand::Receive { link, skip } => {
            let mut shared = SharedLabels::from_link(&link)?;
            for address in common::parse_addresses(&skip)? {
                if shared.selection().is_selected(&address) {
                    shared.toggle(&address);
                }
            }
            let count = shared.save(&directory).await?;
            println!("Saved {count} of {} shared labels", shared.labels().len());
        }

        LabelsCommand::Clear { yes } => {
            common::require_confirmation(yes, "clearing every label")?;
            directory.clear_all().await?;
            println!("Cleared labels for {}", config.organization_label());
        }
    }

    Ok(())
}

/// Write an export file into `out`, returning its path.
async fn write_export(out: &Path, org_label: &str, entries: &[LabelEntry]) -> Result<PathBuf> {
    let json = export_json(entries)?;
    let path = out.join(export_file_name(org_label, chrono::Local::now().date_naive()));
    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}
