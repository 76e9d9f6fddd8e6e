//! Plex catalog access.
//!
//! The sync only needs a handful of server capabilities. They are split into
//! traits so the orchestration can run against any implementation:
//! [`Catalog`] (show expansion, shared), [`RemoteLibrary`] (label search,
//! optimize, download) and [`LocalLibrary`] (enumerate, refresh).
//! [`PlexClient`] implements all three over the Plex HTTP API.

mod error;
mod http;
mod wire;


pub use error::PlexError;

use std::path::Path;

use crate::media::{CatalogEntry, Episode, MediaItem, Part, Show};
use http::{HttpClient, Method};
use wire::{Envelope, MetadataContainer, MetadataEntry, SectionContainer};

/// Playlist that collects optimization jobs on a Plex server.
const OPTIMIZE_PLAYLIST: &str = "/playlists/1/items";
/// `Item[type]` for an optimize request.
const OPTIMIZE_ITEM_TYPE: &str = "42";

/// A library section of the local server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub key: String,
    pub title: String,
    pub kind: String,
}

/// Result of asking the remote server to optimize an item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptimizeOutcome {
    /// A new optimization job was accepted.
    Requested,
    /// The server rejected the request as a bad request: a job already exists.
    AlreadyExists,
    /// Anything else went wrong; the reason is kept for logging.
    Failed(String),
}

/// Capability shared by both servers: expand a show into its episodes.
pub trait Catalog {
    fn episodes(&self, show: &Show) -> Result<Vec<Episode>, PlexError>;
}

/// The server holding tagged media and performing optimization.
pub trait RemoteLibrary: Catalog {
    /// Items (movies and shows) carrying `label`.
    fn search_label(&self, label: &str) -> Result<Vec<CatalogEntry>, PlexError>;

    /// Request a mobile-optimized rendition tagged with `target_tag_id`.
    fn optimize(&self, item: &MediaItem, target_tag_id: u32) -> OptimizeOutcome;

    /// Stream `part` into `dest`, returning bytes written.
    fn download(&self, part: &Part, dest: &Path) -> Result<u64, PlexError>;
}

/// The server on this device that receives downloads.
pub trait LocalLibrary: Catalog {
    /// Every top-level item in every section.
    fn all_items(&self) -> Result<Vec<CatalogEntry>, PlexError>;

    fn sections(&self) -> Result<Vec<Section>, PlexError>;

    /// Ask a section to rescan. Returns once the server accepted the request.
    fn refresh_section(&self, section: &Section) -> Result<(), PlexError>;
}

/// Plex HTTP API client for one server.
#[derive(Clone)]
pub struct PlexClient {
    http: HttpClient,
}

impl PlexClient {
    pub fn new(base_uri: &str, token: &str) -> Self {
        Self {
            http: HttpClient::new(base_uri, token),
        }
    }

    pub fn base_uri(&self) -> &str {
        self.http.base()
    }

    fn metadata(&self, path: &str, query: &[(&str, &str)]) -> Result<MetadataContainer, PlexError> {
        let env: Envelope<MetadataContainer> = self.http.get_json(path, query)?;
        Ok(env.container)
    }

    fn entries(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<CatalogEntry>, PlexError> {
        Ok(self
            .metadata(path, query)?
            .metadata
            .into_iter()
            .filter_map(MetadataEntry::into_catalog_entry)
            .collect())
    }

    /// Library section UUID an item lives in, needed to address it in an optimize request.
    fn section_uuid(&self, rating_key: &str) -> Result<String, PlexError> {
        let container = self.metadata(&format!("/library/metadata/{}", rating_key), &[])?;
        container
            .metadata
            .into_iter()
            .find_map(|m| m.library_section_uuid)
            .or(container.library_section_uuid)
            .ok_or_else(|| PlexError::MissingSection(rating_key.to_string()))
    }

    fn request_optimize(&self, item: &MediaItem, target_tag_id: u32) -> Result<(), PlexError> {
        let uuid = self.section_uuid(item.rating_key())?;
        let item_key = format!("/library/metadata/{}", item.rating_key());
        let encoded_key: String = url::form_urlencoded::byte_serialize(item_key.as_bytes()).collect();
        let location = format!("library://{}/item/{}", uuid, encoded_key);
        let tag = target_tag_id.to_string();
        let title = item.title_key();

        let query = [
            ("Item[type]", OPTIMIZE_ITEM_TYPE),
            ("Item[title]", title.as_str()),
            ("Item[target]", ""),
            ("Item[targetTagID]", tag.as_str()),
            ("Item[locationID]", "-1"),
            ("Item[Location][uri]", location.as_str()),
            ("Item[Policy][scope]", "all"),
            ("Item[Policy][value]", ""),
            ("Item[Policy][unwatched]", "0"),
        ];
        self.http.request(Method::Put, OPTIMIZE_PLAYLIST, &query)?;
        Ok(())
    }
}

impl Catalog for PlexClient {
    fn episodes(&self, show: &Show) -> Result<Vec<Episode>, PlexError> {
        let entries = self.entries(&format!("/library/metadata/{}/allLeaves", show.rating_key), &[])?;
        Ok(entries
            .into_iter()
            .filter_map(|e| match e {
                CatalogEntry::Episode(ep) => Some(ep),
                _ => None,
            })
            .collect())
    }
}

impl RemoteLibrary for PlexClient {
    fn search_label(&self, label: &str) -> Result<Vec<CatalogEntry>, PlexError> {
        self.entries("/library/all", &[("label", label)])
    }

    fn optimize(&self, item: &MediaItem, target_tag_id: u32) -> OptimizeOutcome {
        match self.request_optimize(item, target_tag_id) {
            Ok(()) => OptimizeOutcome::Requested,
            Err(e) if e.is_bad_request() => OptimizeOutcome::AlreadyExists,
            Err(e) => OptimizeOutcome::Failed(e.to_string()),
        }
    }

    fn download(&self, part: &Part, dest: &Path) -> Result<u64, PlexError> {
        self.http.download_to(&part.key, &[("download", "1")], dest)
    }
}

impl LocalLibrary for PlexClient {
    fn all_items(&self) -> Result<Vec<CatalogEntry>, PlexError> {
        let mut items = Vec::new();
        for section in self.sections()? {
            items.extend(self.entries(&format!("/library/sections/{}/all", section.key), &[])?);
        }
        Ok(items)
    }

    fn sections(&self) -> Result<Vec<Section>, PlexError> {
        let env: Envelope<SectionContainer> = self.http.get_json("/library/sections", &[])?;
        Ok(env
            .container
            .directories
            .into_iter()
            .map(|d| Section {
                key: d.key,
                title: d.title,
                kind: d.kind,
            })
            .collect())
    }

    fn refresh_section(&self, section: &Section) -> Result<(), PlexError> {
        self.http
            .request(Method::Get, &format!("/library/sections/{}/refresh", section.key), &[])?;
        Ok(())
    }
}
