use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to a Plex server or writing what it sends.
#[derive(Debug, Error)]
pub enum PlexError {
    #[error("invalid URL {url}: {source}")]
    Url {
        url: String,
        source: url::ParseError,
    },

    #[error("{method} {url} failed: {source}")]
    Transport {
        method: &'static str,
        url: String,
        source: curl::Error,
    },

    #[error("{method} {url} returned HTTP {status}")]
    Status {
        method: &'static str,
        url: String,
        status: u32,
    },

    #[error("could not decode response from {url}: {source}")]
    Decode {
        url: String,
        source: serde_json::Error,
    },

    #[error("metadata for {0} has no library section UUID")]
    MissingSection(String),

    #[error("{0} has no part optimized for streaming")]
    NoStreamingPart(String),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl PlexError {
    /// HTTP status code if the server answered with a non-2xx response.
    pub fn status(&self) -> Option<u32> {
        match self {
            PlexError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True for HTTP 400, which the optimize endpoint returns for a job that already exists.
    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(400)
    }
}
