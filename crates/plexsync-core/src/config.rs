use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while locating, creating, or parsing `config.toml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not resolve XDG config directory: {0}")]
    Xdg(#[from] xdg::BaseDirectoriesError),

    #[error("config I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("could not render config template: {0}")]
    Template(#[from] toml::ser::Error),

    #[error("wrote a config template to {0}; fill in the PLEX and MEDIA sections and run again")]
    TemplateCreated(PathBuf),

    #[error("config value {0} must not be empty")]
    Empty(&'static str),
}

/// Connection settings for the remote and local Plex servers.
#[derive(Clone, Serialize, Deserialize)]
pub struct PlexConfig {
    /// Server that holds the tagged media and performs optimization.
    #[serde(rename = "RemoteURI")]
    pub remote_uri: String,
    /// Server on this device whose library receives the downloads.
    #[serde(rename = "LocalURI")]
    pub local_uri: String,
    /// `X-Plex-Token` sent to both servers.
    #[serde(rename = "Token")]
    pub token: String,
    /// Label identifying items to sync.
    #[serde(rename = "MOBILE_LABEL_ID")]
    pub mobile_label_id: String,
    /// Optimization target tag requested from the remote server.
    #[serde(rename = "TARGET_TAG_ID", default = "default_target_tag_id")]
    pub target_tag_id: u32,
    /// Rendition target that marks a finished mobile optimization.
    #[serde(rename = "OPTIMIZED_TARGET", default = "default_optimized_target")]
    pub optimized_target: String,
}

// Keeps the token out of `debug!("loaded config: {:?}")`.
impl fmt::Debug for PlexConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlexConfig")
            .field("remote_uri", &self.remote_uri)
            .field("local_uri", &self.local_uri)
            .field("token", &"<redacted>")
            .field("mobile_label_id", &self.mobile_label_id)
            .field("target_tag_id", &self.target_tag_id)
            .field("optimized_target", &self.optimized_target)
            .finish()
    }
}

/// Filesystem roots that downloads are placed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(rename = "MEDIA_ROOT")]
    pub media_root: PathBuf,
    #[serde(rename = "MOVIE_ROOT")]
    pub movie_root: String,
    #[serde(rename = "TV_ROOT")]
    pub tv_root: String,
}

/// Which wireless network the run is allowed on, and how to ask the OS about it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(rename = "SSID", default = "default_ssid")]
    pub ssid: String,
    #[serde(rename = "INTERFACE", default = "default_interface")]
    pub interface: String,
    #[serde(rename = "STATUS_COMMAND", default = "default_status_command")]
    pub status_command: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            ssid: default_ssid(),
            interface: default_interface(),
            status_command: default_status_command(),
        }
    }
}

/// Global configuration loaded from `~/.config/plexsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(rename = "PLEX")]
    pub plex: PlexConfig,
    #[serde(rename = "MEDIA")]
    pub media: MediaConfig,
    #[serde(rename = "NETWORK", default)]
    pub network: NetworkConfig,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            plex: PlexConfig {
                remote_uri: String::new(),
                local_uri: "http://127.0.0.1:32400".to_string(),
                token: String::new(),
                mobile_label_id: String::new(),
                target_tag_id: default_target_tag_id(),
                optimized_target: default_optimized_target(),
            },
            media: MediaConfig {
                media_root: PathBuf::from("/mnt/media"),
                movie_root: "Movies".to_string(),
                tv_root: "TV".to_string(),
            },
            network: NetworkConfig::default(),
        }
    }
}

impl SyncConfig {
    /// Rejects configs whose required connection values are blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("PLEX.RemoteURI", &self.plex.remote_uri),
            ("PLEX.LocalURI", &self.plex.local_uri),
            ("PLEX.Token", &self.plex.token),
            ("PLEX.MOBILE_LABEL_ID", &self.plex.mobile_label_id),
            ("MEDIA.MOVIE_ROOT", &self.media.movie_root),
            ("MEDIA.TV_ROOT", &self.media.tv_root),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Empty(key));
            }
        }
        if self.media.media_root.as_os_str().is_empty() {
            return Err(ConfigError::Empty("MEDIA.MEDIA_ROOT"));
        }
        Ok(())
    }
}

fn default_target_tag_id() -> u32 {
    1
}

fn default_optimized_target() -> String {
    "Optimized for Mobile".to_string()
}

fn default_ssid() -> String {
    "thelastresort".to_string()
}

fn default_interface() -> String {
    "wlan0".to_string()
}

fn default_status_command() -> String {
    "wpa_cli".to_string()
}

const TEMPLATE_HEADER: &str = "\
# plexsync configuration.
#
# [PLEX]     RemoteURI / LocalURI are base URLs of the two servers, Token is the
#            X-Plex-Token, MOBILE_LABEL_ID the label marking items to sync.
# [MEDIA]    MEDIA_ROOT is where downloads land; MOVIE_ROOT and TV_ROOT are
#            subdirectories of it.
# [NETWORK]  Only sync while associated with SSID on INTERFACE.

";

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("plexsync")?;
    xdg_dirs
        .place_config_file("config.toml")
        .map_err(|source| ConfigError::Io {
            path: xdg_dirs.get_config_home(),
            source,
        })
}

/// Load configuration from `path`.
///
/// A missing file is replaced by a template and reported as
/// [`ConfigError::TemplateCreated`]: the token and server URIs have no usable defaults.
pub fn load_or_init(path: &Path) -> Result<SyncConfig, ConfigError> {
    if !path.exists() {
        let template = format!(
            "{}{}",
            TEMPLATE_HEADER,
            toml::to_string_pretty(&SyncConfig::default())?
        );
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, template).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("created config template at {}", path.display());
        return Err(ConfigError::TemplateCreated(path.to_path_buf()));
    }

    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: SyncConfig = toml::from_str(&data).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    Ok(cfg)
}
