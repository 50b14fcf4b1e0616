//! Source acquisition: getting images into the library.
//!
//! Two independent producers feed an [`ImageLibrary`]:
//!
//! - **Uploads** ([`ingest_uploads`]): a batch of `(name, bytes)` pairs. Each
//!   item succeeds or fails on its own; one corrupt file never stops the rest
//!   of the batch.
//! - **URL fetch** ([`ingest_url`]): one HTTP GET through a [`Fetcher`], then
//!   decode and insert under a generated name. Any failure leaves the library
//!   exactly as it was.
//!
//! The [`Fetcher`] trait is the seam between the network and the library;
//! [`HttpFetcher`] is the production implementation.

use crate::config::FetchConfig;
use crate::imaging::{BackendError, ImageBackend};
use crate::library::{ImageLibrary, LibraryError, Origin};
use crate::naming;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AcquireError {
    #[error("Fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },
    #[error("Failed to decode {name}: {source}")]
    Decode {
        name: String,
        #[source]
        source: BackendError,
    },
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("Cannot read {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Library(LibraryError),
}

impl From<LibraryError> for AcquireError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::Decode { name, source } => Self::Decode { name, source },
            other => Self::Library(other),
        }
    }
}

/// One file from an upload batch.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Per-item outcome of an upload batch.
#[derive(Debug, Default)]
pub struct IngestReport {
    /// Newly inserted names, in batch order.
    pub added: Vec<String>,
    /// Names already in the library, including ones added earlier in the batch.
    pub skipped: Vec<String>,
    pub failed: Vec<(String, AcquireError)>,
}

impl IngestReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Library name for a local file: its file name, or the whole path when it
/// has none.
pub fn upload_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

impl Upload {
    /// Read a local file; the library name is [`upload_name`].
    pub fn from_path(path: &Path) -> Result<Self, AcquireError> {
        let name = upload_name(path);
        let bytes = std::fs::read(path).map_err(|source| AcquireError::Io {
            name: name.clone(),
            source,
        })?;
        Ok(Self { name, bytes })
    }
}

/// Whether `name` has one of the accepted extensions (case-insensitive).
pub fn is_accepted(name: &str, accepted_extensions: &[String]) -> bool {
    naming::extension(name).is_some_and(|ext| {
        accepted_extensions
            .iter()
            .any(|a| a.eq_ignore_ascii_case(&ext))
    })
}

/// Add a batch of uploads, isolating failures per item.
pub fn ingest_uploads(
    library: &mut ImageLibrary,
    backend: &impl ImageBackend,
    uploads: &[Upload],
    accepted_extensions: &[String],
) -> IngestReport {
    let mut report = IngestReport::default();

    for upload in uploads {
        let name = upload.name.as_str();
        if library.contains(name) {
            report.skipped.push(name.to_string());
            continue;
        }
        if !is_accepted(name, accepted_extensions) {
            warn!(name, "rejected upload with unsupported extension");
            report
                .failed
                .push((name.to_string(), AcquireError::UnsupportedType(name.to_string())));
            continue;
        }
        match library.add_if_absent(backend, name, &upload.bytes) {
            Ok(true) => report.added.push(name.to_string()),
            Ok(false) => report.skipped.push(name.to_string()),
            Err(err) => {
                warn!(name, error = %err, "upload failed");
                report.failed.push((name.to_string(), err.into()));
            }
        }
    }

    info!(
        added = report.added.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "upload batch ingested"
    );
    report
}

/// Retrieves raw bytes for a URL.
pub trait Fetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AcquireError>;
}

/// Blocking HTTP(S) fetcher.
///
/// The body is streamed and capped at `max_bytes`; anything larger is a
/// fetch error rather than a silently truncated image.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self, AcquireError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AcquireError::Fetch {
                url: String::new(),
                reason: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            max_bytes: config.max_bytes,
        })
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, AcquireError> {
        let fail = |reason: String| AcquireError::Fetch {
            url: url.to_string(),
            reason,
        };

        debug!(url, "fetching");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| fail(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(fail(format!("HTTP status {status}")));
        }

        let mut body = Vec::new();
        response
            .take(self.max_bytes + 1)
            .read_to_end(&mut body)
            .map_err(|e| fail(format!("reading body: {e}")))?;
        if body.len() as u64 > self.max_bytes {
            return Err(fail(format!("response exceeds {} bytes", self.max_bytes)));
        }
        debug!(url, bytes = body.len(), "fetched");
        Ok(body)
    }
}

/// Fetch `url`, decode it, and insert it under a generated name.
pub fn ingest_url(
    library: &mut ImageLibrary,
    backend: &impl ImageBackend,
    fetcher: &impl Fetcher,
    url: &str,
) -> Result<String, AcquireError> {
    let bytes = fetcher.fetch(url)?;
    let image = backend.decode(&bytes).map_err(|source| AcquireError::Decode {
        name: url.to_string(),
        source,
    })?;
    let name = library.insert_generated(image, Origin::Url(url.to_string()), bytes.len());
    info!(url, name = %name, "image fetched");
    Ok(name)
}
