//! CLI parse and exit-code tests.

use super::commands::{run_check_network, run_sync};
use super::{exit_code, Cli, CliCommand, EXIT_FAILURE, EXIT_WRONG_NETWORK};
use clap::Parser;
use plexsync_core::config::SyncConfig;
use plexsync_core::network::WrongNetwork;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::path::{Path, PathBuf};

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args).unwrap()
}

#[test]
fn cli_parse_run() {
    match parse(&["plexsync", "run"]).command {
        CliCommand::Run {
            dry_run,
            skip_network_check,
        } => {
            assert!(!dry_run);
            assert!(!skip_network_check);
        }
        _ => panic!("expected Run"),
    }
}

#[test]
fn cli_parse_run_flags() {
    match parse(&["plexsync", "run", "--dry-run", "--skip-network-check"]).command {
        CliCommand::Run {
            dry_run,
            skip_network_check,
        } => {
            assert!(dry_run);
            assert!(skip_network_check);
        }
        _ => panic!("expected Run with flags"),
    }
}

#[test]
fn cli_parse_check_network() {
    match parse(&["plexsync", "check-network"]).command {
        CliCommand::CheckNetwork => {}
        _ => panic!("expected CheckNetwork"),
    }
}

#[test]
fn cli_parse_candidates() {
    match parse(&["plexsync", "candidates"]).command {
        CliCommand::Candidates => {}
        _ => panic!("expected Candidates"),
    }
}

#[test]
fn cli_parse_global_flags_after_subcommand() {
    let cli = parse(&[
        "plexsync",
        "run",
        "--config",
        "/etc/plexsync.toml",
        "--log-file",
        "/var/log/plexsync.log",
    ]);
    assert_eq!(cli.config, Some(PathBuf::from("/etc/plexsync.toml")));
    assert_eq!(cli.log_file, Some(PathBuf::from("/var/log/plexsync.log")));
}

#[test]
fn cli_requires_subcommand() {
    assert!(Cli::try_parse_from(["plexsync"]).is_err());
}

#[test]
fn wrong_network_exits_with_one() {
    let err = anyhow::Error::new(WrongNetwork {
        ssid: "thelastresort".to_string(),
    });
    assert_eq!(exit_code(&err), EXIT_WRONG_NETWORK);
}

#[test]
fn other_errors_exit_with_two() {
    let err = anyhow::anyhow!("GET http://x/library/all returned HTTP 500");
    assert_eq!(exit_code(&err), EXIT_FAILURE);
    let wrapped = anyhow::Error::new(WrongNetwork {
        ssid: "x".to_string(),
    })
    .context("while running");
    assert_eq!(exit_code(&wrapped), EXIT_WRONG_NETWORK);
}

/// Stand-in `wpa_cli` that prints `output` whatever its arguments.
#[cfg(unix)]
fn fake_status_command(dir: &Path, output: &str) -> String {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("wpa_cli");
    std::fs::write(&path, format!("#!/bin/sh\ncat <<'EOF'\n{}\nEOF\n", output)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    // A concurrent fork can briefly hold the write fd open (ETXTBSY).
    for _ in 0..50 {
        match std::process::Command::new(&path).output() {
            Err(e) if e.raw_os_error() == Some(26) => {
                std::thread::sleep(std::time::Duration::from_millis(10))
            }
            _ => break,
        }
    }
    path.to_string_lossy().into_owned()
}

/// Config whose servers both point at `listener` and whose gate runs `status_command`.
fn gated_config(listener: &TcpListener, status_command: String, media_root: &Path) -> SyncConfig {
    let base = format!("http://{}", listener.local_addr().unwrap());
    let mut cfg = SyncConfig::default();
    cfg.plex.remote_uri = base.clone();
    cfg.plex.local_uri = base;
    cfg.plex.token = "secret".to_string();
    cfg.plex.mobile_label_id = "mobile".to_string();
    cfg.media.media_root = media_root.to_path_buf();
    cfg.network.ssid = "thelastresort".to_string();
    cfg.network.status_command = status_command;
    cfg
}

fn assert_no_connections(listener: &TcpListener) {
    listener.set_nonblocking(true).unwrap();
    match listener.accept() {
        Err(e) if e.kind() == ErrorKind::WouldBlock => {}
        Ok((_, peer)) => panic!("unexpected connection from {}", peer),
        Err(e) => panic!("accept failed: {}", e),
    }
}

#[cfg(unix)]
#[test]
fn wrong_network_aborts_run_before_contacting_servers() {
    let dir = tempfile::tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let status = fake_status_command(dir.path(), "ssid=coffeeshop\nwpa_state=COMPLETED");
    let cfg = gated_config(&listener, status, dir.path());

    let err = run_sync(&cfg, false, false).unwrap_err();

    assert_eq!(exit_code(&err), EXIT_WRONG_NETWORK);
    assert_no_connections(&listener);
    assert!(!dir.path().join(&cfg.media.movie_root).exists());
}

#[cfg(unix)]
#[test]
fn wrong_network_aborts_dry_run_too() {
    let dir = tempfile::tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let status = fake_status_command(dir.path(), "ssid=thelastresort\nwpa_state=SCANNING");
    let cfg = gated_config(&listener, status, dir.path());

    let err = run_sync(&cfg, true, false).unwrap_err();

    assert_eq!(exit_code(&err), EXIT_WRONG_NETWORK);
    assert_no_connections(&listener);
}

#[cfg(unix)]
#[test]
fn check_network_passes_on_expected_network() {
    let dir = tempfile::tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let status = fake_status_command(dir.path(), "ssid=thelastresort\nwpa_state=COMPLETED");
    let cfg = gated_config(&listener, status, dir.path());

    run_check_network(&cfg).unwrap();
    assert_no_connections(&listener);
}

#[test]
fn missing_status_command_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let cfg = gated_config(
        &listener,
        "/nonexistent/plexsync-test-wpa_cli".to_string(),
        dir.path(),
    );

    let err = run_check_network(&cfg).unwrap_err();
    assert_eq!(exit_code(&err), EXIT_WRONG_NETWORK);
}
