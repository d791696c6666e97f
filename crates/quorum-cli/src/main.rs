//! Quorum operator CLI
//!
//! Manages the local identity directory (address labels) of an organization
//! and inspects or edits permissions over a chain snapshot.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{
    common,
    labels::{handle_labels_command, LabelsCommand},
    permissions::{handle_permissions_command, PermissionsArgs},
};

#[derive(Parser)]
#[command(name = "quorum")]
#[command(about = "Quorum - organization permissions and address labels", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Local address labels
    #[command(subcommand)]
    Labels(LabelsCommand),

    /// Permissions of a chain snapshot
    Permissions(PermissionsArgs),

    /// Print the effective configuration
    Config,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            common::report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = common::load_config(cli.config.as_deref())?;

    let log_level = if cli.verbose {
        "debug".to_string()
    } else {
        config.log_level.clone()
    };
    tracing_subscriber::fmt()
        .with_env_filter(log_level.as_str())
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Labels(cmd) => {
            handle_labels_command(cmd, &config).await?;
        }
        Commands::Permissions(args) => {
            handle_permissions_command(args, &config).await?;
        }
        Commands::Config => {
            common::print_config(&config);
        }
    }

    Ok(())
}
