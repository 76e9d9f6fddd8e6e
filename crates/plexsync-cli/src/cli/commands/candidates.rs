//! `plexsync candidates` – show what the next run would try to sync.

use anyhow::{Context, Result};
use plexsync_core::config::SyncConfig;
use plexsync_core::inventory;
use plexsync_core::plex::PlexClient;

pub fn run_candidates(cfg: &SyncConfig) -> Result<()> {
    let remote = PlexClient::new(&cfg.plex.remote_uri, &cfg.plex.token);
    let local = PlexClient::new(&cfg.plex.local_uri, &cfg.plex.token);
    let candidates = inventory::find_candidates(&remote, &local, &cfg.plex.mobile_label_id)
        .context("listing catalogs")?;
    if candidates.is_empty() {
        println!("Nothing to sync.");
    } else {
        for item in candidates {
            println!("{}", item.title_key());
        }
    }
    Ok(())
}
