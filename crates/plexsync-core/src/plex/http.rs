//! Blocking Plex HTTP transport over libcurl easy handles.
//!
//! Every request carries `X-Plex-Token` and asks for JSON. Runs on the calling
//! thread; the sync is strictly sequential so one handle per request is enough.

use serde::de::DeserializeOwned;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use url::Url;

use super::error::PlexError;

const PRODUCT: &str = "plexsync";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Put,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Put => "PUT",
        }
    }
}

#[derive(Clone)]
pub(crate) struct HttpClient {
    base: String,
    token: String,
}

impl HttpClient {
    pub fn new(base_uri: &str, token: &str) -> Self {
        Self {
            base: base_uri.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join `path` onto the server base (keeping any base path prefix) and append `query`.
    pub fn url(&self, path: &str, query: &[(&str, &str)]) -> Result<Url, PlexError> {
        let raw = format!("{}{}", self.base, path);
        let mut url = Url::parse(&raw).map_err(|source| PlexError::Url {
            url: raw.clone(),
            source,
        })?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query.iter().copied());
        }
        Ok(url)
    }

    fn easy(&self, method: Method, url: &Url) -> Result<curl::easy::Easy, curl::Error> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        if method == Method::Put {
            easy.custom_request("PUT")?;
        }

        let mut list = curl::easy::List::new();
        list.append("Accept: application/json")?;
        list.append(&format!("X-Plex-Token: {}", self.token))?;
        list.append(&format!("X-Plex-Product: {}", PRODUCT))?;
        list.append(&format!("X-Plex-Client-Identifier: {}", PRODUCT))?;
        easy.http_headers(list)?;
        Ok(easy)
    }

    /// Perform a request and return the response body. Non-2xx becomes [`PlexError::Status`].
    pub fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>, PlexError> {
        let url = self.url(path, query)?;
        let transport = |source| PlexError::Transport {
            method: method.as_str(),
            url: url.to_string(),
            source,
        };

        let mut body = Vec::new();
        let mut easy = self.easy(method, &url).map_err(transport)?;
        {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| {
                    body.extend_from_slice(data);
                    Ok(data.len())
                })
                .map_err(transport)?;
            transfer.perform().map_err(transport)?;
        }

        let status = easy.response_code().map_err(transport)?;
        if !(200..300).contains(&status) {
            return Err(PlexError::Status {
                method: method.as_str(),
                url: url.to_string(),
                status,
            });
        }
        tracing::trace!(method = method.as_str(), %url, bytes = body.len(), "plex response");
        Ok(body)
    }

    pub fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, PlexError> {
        let body = self.request(Method::Get, path, query)?;
        serde_json::from_slice(&body).map_err(|source| PlexError::Decode {
            url: format!("{}{}", self.base, path),
            source,
        })
    }

    /// Stream a GET response body into `dest`, returning the number of bytes written.
    ///
    /// The file is created (truncated) before the transfer starts. On failure it is left as-is.
    pub fn download_to(
        &self,
        path: &str,
        query: &[(&str, &str)],
        dest: &Path,
    ) -> Result<u64, PlexError> {
        let url = self.url(path, query)?;
        let transport = |source| PlexError::Transport {
            method: "GET",
            url: url.to_string(),
            source,
        };
        let io_err = |source: io::Error| PlexError::Io {
            path: dest.to_path_buf(),
            source,
        };

        let file = fs::File::create(dest).map_err(io_err)?;
        let mut out = BufWriter::new(file);
        let mut written: u64 = 0;
        let mut write_error: Option<io::Error> = None;

        let mut easy = self.easy(Method::Get, &url).map_err(transport)?;
        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .write_function(|data| match out.write_all(data) {
                    Ok(()) => {
                        written += data.len() as u64;
                        Ok(data.len())
                    }
                    Err(e) => {
                        tracing::warn!("download write failed: {}", e);
                        write_error = Some(e);
                        Ok(0) // abort transfer
                    }
                })
                .map_err(transport)?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(io_err(e));
        }
        performed.map_err(transport)?;

        let status = easy.response_code().map_err(transport)?;
        if !(200..300).contains(&status) {
            return Err(PlexError::Status {
                method: "GET",
                url: url.to_string(),
                status,
            });
        }

        out.flush().map_err(io_err)?;
        out.get_ref().sync_all().map_err(io_err)?;
        Ok(written)
    }
}
