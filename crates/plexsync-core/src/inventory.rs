//! Inventory diff: which tagged remote items are missing locally.
//!
//! Correlation is by title key only. Two different items that derive the same
//! key are treated as the same item; a rename on either side breaks the match.

use std::collections::HashSet;

use crate::media::{CatalogEntry, MediaItem};
use crate::plex::{LocalLibrary, PlexError, RemoteLibrary};

/// Title keys of every movie and episode the local server holds.
pub fn list_local_titles<L: LocalLibrary + ?Sized>(local: &L) -> Result<HashSet<String>, PlexError> {
    let mut titles = HashSet::new();
    for entry in local.all_items()? {
        match entry {
            CatalogEntry::Movie(m) => {
                titles.insert(MediaItem::Movie(m).title_key());
            }
            CatalogEntry::Show(show) => {
                for ep in local.episodes(&show)? {
                    titles.insert(MediaItem::Episode(ep).title_key());
                }
            }
            CatalogEntry::Episode(_) => {}
        }
    }
    tracing::debug!(count = titles.len(), "local titles");
    Ok(titles)
}

/// Remote movies and show episodes carrying `label`, in discovery order.
///
/// Labeled shows are expanded to all of their episodes. Individually labeled
/// episodes are not picked up: labels apply to movies and shows.
pub fn list_tagged_remote_media<R: RemoteLibrary + ?Sized>(
    remote: &R,
    label: &str,
) -> Result<Vec<MediaItem>, PlexError> {
    let mut items = Vec::new();
    for entry in remote.search_label(label)? {
        match entry {
            CatalogEntry::Movie(m) => items.push(MediaItem::Movie(m)),
            CatalogEntry::Show(show) => {
                let episodes = remote.episodes(&show)?;
                tracing::debug!(show = %show.title, episodes = episodes.len(), "expanded tagged show");
                items.extend(episodes.into_iter().map(MediaItem::Episode));
            }
            CatalogEntry::Episode(ep) => {
                tracing::debug!(episode = %ep.title, "ignoring directly labeled episode");
            }
        }
    }
    tracing::debug!(count = items.len(), label, "tagged remote media");
    Ok(items)
}

/// Keep tagged items whose title key the local server does not hold. Order is preserved.
pub fn sync_candidates(tagged: Vec<MediaItem>, local_titles: &HashSet<String>) -> Vec<MediaItem> {
    tagged
        .into_iter()
        .filter(|item| !local_titles.contains(&item.title_key()))
        .collect()
}

/// List both catalogs and return the tagged items missing locally.
pub fn find_candidates<R, L>(remote: &R, local: &L, label: &str) -> Result<Vec<MediaItem>, PlexError>
where
    R: RemoteLibrary + ?Sized,
    L: LocalLibrary + ?Sized,
{
    let local_titles = list_local_titles(local)?;
    let tagged = list_tagged_remote_media(remote, label)?;
    Ok(sync_candidates(tagged, &local_titles))
}
