//! Save-directory and filename derivation. Pure: no I/O.

use std::path::PathBuf;

use super::sanitize::{sanitize_filename_for_linux, truncate_on_char_boundary, NAME_MAX};
use super::{Episode, MediaItem, Movie, Part};
use crate::config::MediaConfig;
use crate::fetch::TEMP_SUFFIX;

/// Container extensions longer than this are cut so the stem keeps its room.
const MAX_EXTENSION: usize = 16;

pub fn episode_title_key(show: &str, season: &str, episode: &str) -> String {
    format!("{}-{}-{}", show, season, episode)
}

/// Directory a downloaded item is saved into.
///
/// - Movie: `{MEDIA_ROOT}/{MOVIE_ROOT}/{Title} ({Year})`
/// - Episode: `{MEDIA_ROOT}/{TV_ROOT}/{Show}/{Season.Title}` (spaces in the season become dots)
///
/// Names taken from server metadata always form a single component below
/// the root: separators are replaced and `..` or empty names become `_`.
pub fn save_dir(item: &MediaItem, media: &MediaConfig) -> PathBuf {
    match item {
        MediaItem::Movie(m) => media
            .media_root
            .join(&media.movie_root)
            .join(path_component(&movie_dir_name(m))),
        MediaItem::Episode(e) => media
            .media_root
            .join(&media.tv_root)
            .join(path_component(&e.show_title))
            .join(path_component(&season_dir_name(e))),
    }
}

fn path_component(name: &str) -> String {
    let clean = sanitize_filename_for_linux(name);
    if clean.is_empty() {
        "_".to_string()
    } else {
        clean
    }
}

/// A missing year gives the bare title rather than `Title (None)`, so such
/// movies land in a different directory than older installs produced.
fn movie_dir_name(movie: &Movie) -> String {
    match movie.year {
        Some(year) => format!("{} ({})", movie.title, year),
        None => movie.title.clone(),
    }
}

fn season_dir_name(episode: &Episode) -> String {
    episode.season_title.replace(' ', ".")
}

/// Human-friendly file stem, as the server names downloads.
///
/// - Movie: `Title (Year)`
/// - Episode: `Show.Title.s01e05`
pub fn pretty_filename(item: &MediaItem) -> String {
    match item {
        MediaItem::Movie(m) => movie_dir_name(m),
        MediaItem::Episode(e) => format!(
            "{}.s{:02}e{:02}",
            e.show_title.replace(' ', "."),
            e.season_number.unwrap_or(0),
            e.episode_number.unwrap_or(0)
        ),
    }
}

/// Filename for a downloaded part: pretty stem plus the part's container extension.
///
/// Long stems are shortened so the name still fits once the temp suffix is
/// appended; the extension is never cut off.
pub fn download_filename(item: &MediaItem, part: &Part) -> String {
    let ext = part
        .container
        .as_deref()
        .map(sanitize_filename_for_linux)
        .map(|c| truncate_on_char_boundary(&c, MAX_EXTENSION).to_string())
        .filter(|c| !c.is_empty());

    let budget = NAME_MAX - TEMP_SUFFIX.len() - ext.as_ref().map_or(0, |e| e.len() + 1);
    let stem = path_component(&pretty_filename(item));
    let stem = truncate_on_char_boundary(&stem, budget).trim_end_matches(|c| c == ' ' || c == '.');

    match ext {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem.to_string(),
    }
}
