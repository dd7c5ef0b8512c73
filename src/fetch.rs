//! Network fetching and on-disk placement of downloaded assets.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use crate::config::VendorConfig;
use crate::models::{AssetReference, LocalAsset};

/// Failure to retrieve a remote resource.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// No response arrived within the configured timeout.
    #[error("timed out fetching {url}")]
    Timeout {
        /// Requested URL.
        url: String,
    },
    /// The server answered with a non-success status code.
    #[error("HTTP {status} for {url}")]
    Status {
        /// Requested URL.
        url: String,
        /// Response status code.
        status: u16,
    },
    /// Connection, TLS or body transfer failure.
    #[error("request to {url} failed: {message}")]
    Transport {
        /// Requested URL.
        url: String,
        /// Underlying client error text.
        message: String,
    },
}

/// Blocking retrieval of a URL's body; the only network boundary in the crate.
pub trait Fetch {
    /// Perform a GET request and return the full body of a successful response.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        (**self).fetch(url)
    }
}

/// [`Fetch`] implementation backed by a blocking `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Build a client whose requests fail after `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|err| classify_error(url, err))?;
        let body = response.bytes().map_err(|err| classify_error(url, err))?;
        Ok(body.to_vec())
    }
}

fn classify_error(url: &str, err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout {
            url: url.to_string(),
        };
    }
    match err.status() {
        Some(status) => FetchError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        },
        None => FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        },
    }
}

/// Failure to place a referenced asset on disk.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The URL path has no usable final segment.
    #[error("cannot derive a file name from {url}")]
    NoFileName {
        /// Offending URL.
        url: String,
    },
    /// The remote request failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// Creating the category directory or writing the file failed.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        /// Destination that could not be written.
        path: PathBuf,
        /// Source I/O error.
        source: io::Error,
    },
}

/// Final path segment of a URL as written, excluding query string and fragment.
///
/// The segment is taken from the raw text rather than the parsed URL so that names such as
/// `my lib.css` or `é.css` are stored under the name the document spells, not their
/// percent-encoded form.
pub fn asset_file_name(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    if parsed.cannot_be_a_base() {
        return None;
    }

    let without_suffix = url.split(['?', '#']).next()?;
    let after_scheme = without_suffix
        .split_once("://")
        .map_or(without_suffix, |(_, rest)| rest);
    let (_, path) = after_scheme.split_once('/')?;
    let segment = path.rsplit('/').next()?;
    if segment.is_empty() || segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}

/// Download `reference` into `{root}/{category_dir}/{basename}`, overwriting any existing file.
///
/// The category directory is only created once the body has been received, so a failed request
/// leaves the filesystem untouched.
pub fn download_asset<F: Fetch>(
    fetcher: &F,
    root: &Path,
    config: &VendorConfig,
    reference: &AssetReference,
) -> Result<LocalAsset, DownloadError> {
    let file_name =
        asset_file_name(&reference.url).ok_or_else(|| DownloadError::NoFileName {
            url: reference.url.clone(),
        })?;

    tracing::debug!(url = %reference.url, "fetching asset");
    let body = fetcher.fetch(&reference.url)?;

    let dir = root.join(config.category_dir(reference.category));
    fs::create_dir_all(&dir).map_err(|source| DownloadError::Write {
        path: dir.clone(),
        source,
    })?;

    let path = dir.join(&file_name);
    fs::write(&path, &body).map_err(|source| DownloadError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = body.len(), "asset written");

    Ok(LocalAsset {
        category: reference.category,
        file_name,
        path,
    })
}
