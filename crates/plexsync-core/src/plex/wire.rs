//! JSON shapes returned by the Plex HTTP API (`Accept: application/json`).

use serde::{Deserialize, Deserializer};

use crate::media::{CatalogEntry, Episode, Movie, Part, Rendition, Show};

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    #[serde(rename = "MediaContainer")]
    pub container: T,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MetadataContainer {
    #[serde(rename = "librarySectionUUID", default)]
    pub library_section_uuid: Option<String>,
    #[serde(rename = "Metadata", default)]
    pub metadata: Vec<MetadataEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetadataEntry {
    pub rating_key: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub year: Option<u32>,
    #[serde(default)]
    pub grandparent_title: Option<String>,
    #[serde(default)]
    pub parent_title: Option<String>,
    #[serde(default)]
    pub parent_index: Option<u32>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(rename = "librarySectionUUID", default)]
    pub library_section_uuid: Option<String>,
    #[serde(rename = "Media", default)]
    pub media: Vec<MediaEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MediaEntry {
    #[serde(default)]
    pub target: Option<String>,
    #[serde(rename = "Part", default)]
    pub parts: Vec<PartEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PartEntry {
    pub key: String,
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub optimized_for_streaming: bool,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SectionContainer {
    #[serde(rename = "Directory", default)]
    pub directories: Vec<SectionEntry>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SectionEntry {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Plex encodes flags as `1`/`0`, `true`/`false`, or occasionally strings.
fn flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Str(String),
    }

    Ok(match Flag::deserialize(d)? {
        Flag::Bool(b) => b,
        Flag::Int(n) => n != 0,
        Flag::Str(s) => s == "1" || s.eq_ignore_ascii_case("true"),
    })
}

impl MediaEntry {
    fn into_rendition(self) -> Rendition {
        Rendition {
            target: self.target.filter(|t| !t.is_empty()),
            parts: self
                .parts
                .into_iter()
                .map(|p| Part {
                    key: p.key,
                    container: p.container,
                    optimized_for_streaming: p.optimized_for_streaming,
                })
                .collect(),
        }
    }
}

impl MetadataEntry {
    /// Convert to a catalog entry; `None` for types that never sync (artists, photos, ...).
    pub fn into_catalog_entry(self) -> Option<CatalogEntry> {
        match self.kind.as_str() {
            "movie" => Some(CatalogEntry::Movie(Movie {
                rating_key: self.rating_key,
                title: self.title,
                year: self.year,
                renditions: self.media.into_iter().map(MediaEntry::into_rendition).collect(),
            })),
            "episode" => Some(CatalogEntry::Episode(Episode {
                rating_key: self.rating_key,
                title: self.title,
                show_title: self.grandparent_title.unwrap_or_default(),
                season_title: self.parent_title.unwrap_or_default(),
                season_number: self.parent_index,
                episode_number: self.index,
                renditions: self.media.into_iter().map(MediaEntry::into_rendition).collect(),
            })),
            "show" => Some(CatalogEntry::Show(Show {
                rating_key: self.rating_key,
                title: self.title,
            })),
            other => {
                tracing::debug!(kind = other, title = %self.title, "skipping unsupported item type");
                None
            }
        }
    }
}
