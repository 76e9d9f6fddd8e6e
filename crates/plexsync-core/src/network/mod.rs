//! Network gate: only sync while associated with the expected wireless network.
//!
//! Asks `wpa_cli -i<iface> status` for the current association and checks
//! `ssid` and `wpa_state`. Anything unexpected (other SSID, half-finished
//! association, command missing) counts as "not on the expected network".

mod parse;

pub use parse::parse_status;

use std::collections::BTreeMap;
use std::process::Command;
use thiserror::Error;

use crate::config::NetworkConfig;

/// `wpa_state` once association and key negotiation are finished.
pub const COMPLETED_STATE: &str = "COMPLETED";

/// Returned by callers that abort a run because the gate failed.
#[derive(Debug, Error)]
#[error("not on expected network {ssid:?}")]
pub struct WrongNetwork {
    pub ssid: String,
}

/// True iff the parsed status shows a completed association with `expected_ssid`.
pub fn is_expected_network(status: &BTreeMap<String, String>, expected_ssid: &str) -> bool {
    status.get("ssid").map(String::as_str) == Some(expected_ssid)
        && status.get("wpa_state").map(String::as_str) == Some(COMPLETED_STATE)
}

/// Run the OS status query and return its stdout.
pub fn query_status(cfg: &NetworkConfig) -> std::io::Result<String> {
    let output = Command::new(&cfg.status_command)
        .arg(format!("-i{}", cfg.interface))
        .arg("status")
        .output()?;
    if !output.status.success() {
        tracing::debug!(
            command = %cfg.status_command,
            status = %output.status,
            "network status command exited unsuccessfully"
        );
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Check whether this device is on the configured network. Logs the parsed
/// status fields at error level when it is not.
pub fn check_network(cfg: &NetworkConfig) -> bool {
    let output = match query_status(cfg) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!(
                command = %cfg.status_command,
                interface = %cfg.interface,
                "could not query network status: {}",
                e
            );
            return false;
        }
    };

    let status = parse_status(&output);
    if is_expected_network(&status, &cfg.ssid) {
        tracing::debug!(ssid = %cfg.ssid, "on expected network");
        true
    } else {
        tracing::error!("{:?}", status);
        false
    }
}
