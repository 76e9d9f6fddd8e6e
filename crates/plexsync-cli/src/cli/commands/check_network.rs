//! `plexsync check-network` – run the network gate on its own.

use anyhow::Result;
use plexsync_core::config::SyncConfig;
use plexsync_core::network::{self, WrongNetwork};

pub fn run_check_network(cfg: &SyncConfig) -> Result<()> {
    ensure_expected_network(cfg)?;
    println!("on expected network {}", cfg.network.ssid);
    Ok(())
}

/// Fail with [`WrongNetwork`] unless the device is on the configured network.
pub(crate) fn ensure_expected_network(cfg: &SyncConfig) -> Result<()> {
    if network::check_network(&cfg.network) {
        Ok(())
    } else {
        tracing::error!("Not on HOME NETWORK");
        Err(WrongNetwork {
            ssid: cfg.network.ssid.clone(),
        }
        .into())
    }
}
