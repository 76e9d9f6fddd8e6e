//! CLI for plexsync.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use plexsync_core::config;
use plexsync_core::network::WrongNetwork;
use std::path::PathBuf;

use commands::{run_candidates, run_check_network, run_sync};

/// Exit code when the device is not on the expected network.
pub const EXIT_WRONG_NETWORK: i32 = 1;
/// Exit code for every other fatal error.
pub const EXIT_FAILURE: i32 = 2;

/// Top-level CLI for plexsync.
#[derive(Debug, Parser)]
#[command(name = "plexsync")]
#[command(about = "Pull mobile-tagged media from a remote Plex server onto this device", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/plexsync/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Append logs to this file instead of stdout.
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run one sync pass: network gate, diff, optimize/download, library refresh.
    Run {
        /// Only list what would be synced; no optimize, download, or refresh.
        #[arg(long)]
        dry_run: bool,
        /// Skip the wireless network gate.
        #[arg(long)]
        skip_network_check: bool,
    },

    /// Check whether this device is on the configured network.
    CheckNetwork,

    /// Print title keys of tagged remote items missing from the local server.
    Candidates,
}

impl Cli {
    pub fn run(&self) -> Result<()> {
        let path = match &self.config {
            Some(p) => p.clone(),
            None => config::config_path()?,
        };
        let cfg = config::load_or_init(&path)?;
        tracing::debug!("loaded config: {:?}", cfg);

        match &self.command {
            CliCommand::Run {
                dry_run,
                skip_network_check,
            } => run_sync(&cfg, *dry_run, *skip_network_check)?,
            CliCommand::CheckNetwork => run_check_network(&cfg)?,
            CliCommand::Candidates => run_candidates(&cfg)?,
        }

        Ok(())
    }
}

/// Map a fatal error to the process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    if err.downcast_ref::<WrongNetwork>().is_some() {
        EXIT_WRONG_NETWORK
    } else {
        EXIT_FAILURE
    }
}

#[cfg(test)]
mod tests;
