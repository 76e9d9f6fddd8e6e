//! Catalog data model shared by the remote and local servers.
//!
//! Items are correlated across the two servers by their derived title key,
//! never by server-assigned IDs: rating keys differ between servers.

mod naming;
mod sanitize;

pub use naming::{download_filename, episode_title_key, pretty_filename, save_dir};
pub use sanitize::sanitize_filename_for_linux;

use std::path::PathBuf;

use crate::config::MediaConfig;

/// One file of a rendition, addressable for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    /// Server path such as `/library/parts/123/1600000000/file.mp4`.
    pub key: String,
    /// Container/format extension (`mp4`, `mkv`, ...).
    pub container: Option<String>,
    pub optimized_for_streaming: bool,
}

/// A version of an item (original file or a transcoded copy).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendition {
    /// Optimization target label, e.g. `Optimized for Mobile`; `None` for originals.
    pub target: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movie {
    pub rating_key: String,
    pub title: String,
    pub year: Option<u32>,
    pub renditions: Vec<Rendition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub rating_key: String,
    pub title: String,
    pub show_title: String,
    pub season_title: String,
    pub season_number: Option<u32>,
    pub episode_number: Option<u32>,
    pub renditions: Vec<Rendition>,
}

/// A show container; only its episodes take part in syncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Show {
    pub rating_key: String,
    pub title: String,
}

/// A playable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    Movie(Movie),
    Episode(Episode),
}

/// What a catalog listing or label search returns before show expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEntry {
    Movie(Movie),
    Show(Show),
    Episode(Episode),
}

impl MediaItem {
    pub fn rating_key(&self) -> &str {
        match self {
            MediaItem::Movie(m) => &m.rating_key,
            MediaItem::Episode(e) => &e.rating_key,
        }
    }

    pub fn renditions(&self) -> &[Rendition] {
        match self {
            MediaItem::Movie(m) => &m.renditions,
            MediaItem::Episode(e) => &e.renditions,
        }
    }

    /// Key used to decide whether the local server already holds this item.
    ///
    /// Movie: bare title. Episode: `"{show}-{season}-{episode}"`.
    pub fn title_key(&self) -> String {
        match self {
            MediaItem::Movie(m) => m.title.clone(),
            MediaItem::Episode(e) => episode_title_key(&e.show_title, &e.season_title, &e.title),
        }
    }

    /// True if any rendition carries the given optimization target.
    pub fn has_rendition_targeted(&self, target: &str) -> bool {
        self.renditions()
            .iter()
            .any(|r| r.target.as_deref() == Some(target))
    }

    /// First part, across all renditions, flagged as optimized for streaming.
    pub fn streaming_part(&self) -> Option<&Part> {
        self.renditions()
            .iter()
            .flat_map(|r| r.parts.iter())
            .find(|p| p.optimized_for_streaming)
    }

    pub fn save_dir(&self, media: &MediaConfig) -> PathBuf {
        save_dir(self, media)
    }
}
