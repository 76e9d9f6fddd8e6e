//! `plexsync run` – one full sync pass.

use anyhow::{Context, Result};
use plexsync_core::config::SyncConfig;
use plexsync_core::plex::PlexClient;
use plexsync_core::sync::{self, SyncOptions};

use super::check_network::ensure_expected_network;

pub fn run_sync(cfg: &SyncConfig, dry_run: bool, skip_network_check: bool) -> Result<()> {
    if skip_network_check {
        tracing::warn!("network check skipped");
    } else {
        ensure_expected_network(cfg)?;
    }

    let remote = PlexClient::new(&cfg.plex.remote_uri, &cfg.plex.token);
    let local = PlexClient::new(&cfg.plex.local_uri, &cfg.plex.token);
    tracing::debug!(remote = remote.base_uri(), local = local.base_uri(), "starting sync");

    let report = sync::run_sync(&remote, &local, cfg, SyncOptions { dry_run })
        .context("sync pass failed")?;

    for path in &report.downloaded {
        println!("downloaded {}", path.display());
    }
    println!(
        "{} candidate(s): {} ready, {} queued, {} failed",
        report.candidates, report.ready, report.queued, report.failed
    );
    Ok(())
}
