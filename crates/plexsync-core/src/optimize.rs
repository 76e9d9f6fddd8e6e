//! Optimization status check for a sync candidate.
//!
//! Ready means a mobile rendition already exists and can be downloaded now.
//! Queued means optimization was requested (or was already pending) and the
//! download happens on a later run, once the server has finished the job.

use crate::config::PlexConfig;
use crate::media::MediaItem;
use crate::plex::{OptimizeOutcome, RemoteLibrary};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationStatus {
    Ready,
    Queued,
    Failed,
}

/// Check for an existing mobile rendition; otherwise request one.
///
/// Never re-requests optimization for an item that already has the target rendition.
pub fn optimization_status<R: RemoteLibrary + ?Sized>(
    remote: &R,
    item: &MediaItem,
    plex: &PlexConfig,
) -> OptimizationStatus {
    if item.has_rendition_targeted(&plex.optimized_target) {
        return OptimizationStatus::Ready;
    }

    let title = item.title_key();
    match remote.optimize(item, plex.target_tag_id) {
        OptimizeOutcome::Requested => {
            tracing::info!("Queued {}", title);
            OptimizationStatus::Queued
        }
        OptimizeOutcome::AlreadyExists => {
            tracing::warn!("unable to optimize {}. Already exists", title);
            OptimizationStatus::Queued
        }
        OptimizeOutcome::Failed(reason) => {
            tracing::error!("unable to optimize {}: {}", title, reason);
            OptimizationStatus::Failed
        }
    }
}
