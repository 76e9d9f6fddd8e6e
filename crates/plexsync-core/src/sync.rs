//! One sync pass: inventory diff, optimize-and-fetch, catalog refresh.
//!
//! The network gate runs before this and is the caller's job. A candidate whose
//! optimization was only just requested is not downloaded in the same pass;
//! the next scheduled run picks it up once the server reports it ready.

use std::path::PathBuf;

use crate::config::SyncConfig;
use crate::fetch::download_media;
use crate::inventory::find_candidates;
use crate::optimize::{optimization_status, OptimizationStatus};
use crate::plex::{LocalLibrary, PlexError, RemoteLibrary};

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Compute and log candidates, but do not optimize, download, or refresh.
    pub dry_run: bool,
}

/// Counts for one pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub candidates: usize,
    pub ready: usize,
    pub queued: usize,
    pub failed: usize,
    pub downloaded: Vec<PathBuf>,
    pub sections_refreshed: usize,
}

/// Run stages 2-4 against the given servers.
///
/// Listing, download and section-listing errors abort the pass. Optimize
/// failures only skip their candidate. Refresh results are not checked.
pub fn run_sync<R, L>(
    remote: &R,
    local: &L,
    cfg: &SyncConfig,
    opts: SyncOptions,
) -> Result<SyncReport, PlexError>
where
    R: RemoteLibrary + ?Sized,
    L: LocalLibrary + ?Sized,
{
    let candidates = find_candidates(remote, local, &cfg.plex.mobile_label_id)?;
    let mut report = SyncReport {
        candidates: candidates.len(),
        ..SyncReport::default()
    };
    tracing::info!(candidates = candidates.len(), "inventory diff complete");

    if opts.dry_run {
        for item in &candidates {
            tracing::info!("would sync {}", item.title_key());
        }
        return Ok(report);
    }

    for item in &candidates {
        match optimization_status(remote, item, &cfg.plex) {
            OptimizationStatus::Ready => {
                report.ready += 1;
                let path = download_media(remote, item, &cfg.media)?;
                report.downloaded.push(path);
            }
            OptimizationStatus::Queued => report.queued += 1,
            OptimizationStatus::Failed => report.failed += 1,
        }
    }

    for section in local.sections()? {
        if let Err(e) = local.refresh_section(&section) {
            tracing::debug!(section = %section.title, "refresh request not accepted: {}", e);
        } else {
            tracing::debug!(section = %section.title, kind = %section.kind, "refresh requested");
        }
        report.sections_refreshed += 1;
    }

    tracing::info!(
        ready = report.ready,
        queued = report.queued,
        failed = report.failed,
        downloaded = report.downloaded.len(),
        "sync pass finished"
    );
    Ok(report)
}
