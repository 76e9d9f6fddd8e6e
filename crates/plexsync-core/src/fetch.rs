//! Download of a ready, optimized rendition into the media tree.
//!
//! Bytes are streamed into `<name>.part` and renamed on completion. A failed
//! transfer leaves the `.part` file behind and is not retried.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::MediaConfig;
use crate::media::{download_filename, MediaItem};
use crate::plex::{PlexError, RemoteLibrary};

/// Temporary file suffix used before the final rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `a.mp4` → `a.mp4.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Create `dir` and any missing parents, world-writable (subject to umask). Idempotent.
pub fn create_dir_permissive(dir: &Path) -> io::Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        fs::DirBuilder::new().recursive(true).mode(0o777).create(dir)
    }
    #[cfg(not(unix))]
    {
        fs::create_dir_all(dir)
    }
}

/// Download the item's first streaming-optimized part into its save directory.
/// Returns the final file path.
pub fn download_media<R: RemoteLibrary + ?Sized>(
    remote: &R,
    item: &MediaItem,
    media: &MediaConfig,
) -> Result<PathBuf, PlexError> {
    let save_dir = item.save_dir(media);
    create_dir_permissive(&save_dir).map_err(|source| PlexError::Io {
        path: save_dir.clone(),
        source,
    })?;
    tracing::info!("Downloading {} to {}", item.title_key(), save_dir.display());

    let part = item
        .streaming_part()
        .ok_or_else(|| PlexError::NoStreamingPart(item.title_key()))?;
    let final_path = save_dir.join(download_filename(item, part));
    let part_path = temp_path(&final_path);

    let bytes = remote.download(part, &part_path)?;
    fs::rename(&part_path, &final_path).map_err(|source| PlexError::Io {
        path: final_path.clone(),
        source,
    })?;
    tracing::info!(bytes, "saved {}", final_path.display());
    Ok(final_path)
}
