//! One interactive editing session.
//!
//! A [`Session`] owns everything a single user works with: the image library,
//! which entry is active, and the current transform parameters. Nothing is
//! global, so separate sessions never see each other's images.
//!
//! ## Lifecycle of a selection
//!
//! ```text
//! select(name)      params ← native size of `name`, default quality
//! set_width/...     params change, nothing is computed yet
//! preview()         transform runs; baseline estimate computed once and cached
//! export()          same transform, packaged as IMGROR_<stem>.jpg
//! ```
//!
//! Every call runs to completion on the caller's thread. Re-running
//! [`Session::preview`] after each parameter change is the "live" part.

use crate::acquire::{self, AcquireError, Fetcher, IngestReport, Upload};
use crate::config::TransformConfig;
use crate::imaging::{
    BackendError, Dimensions, ImageBackend, Quality, SizeChange, TransformOutput,
    TransformParams, estimate_baseline_size, height_for_width, transform, width_for_height,
};
use crate::library::{ImageLibrary, LibraryEntry, LibraryError, Origin};
use crate::naming::export_filename;
use crate::types::{EntrySummary, PreviewReport};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("No image selected")]
    NoSelection,
    #[error(transparent)]
    Library(#[from] LibraryError),
    #[error(transparent)]
    Imaging(#[from] BackendError),
}

/// A rendered preview: the transform output plus what to display about it.
#[derive(Debug, Clone)]
pub struct LivePreview {
    pub output: TransformOutput,
    pub report: PreviewReport,
}

impl LivePreview {
    pub fn into_artifact(self) -> Artifact {
        Artifact {
            filename: self.report.export_filename,
            bytes: self.output.bytes,
        }
    }
}

/// A downloadable JPEG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Artifact {
    /// Write into `dir` (created if missing). Returns the written path.
    pub fn write_to(&self, dir: &Path) -> std::io::Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

#[derive(Debug)]
pub struct Session {
    library: ImageLibrary,
    active: Option<String>,
    params: Option<TransformParams>,
    /// Baseline estimate for the active entry.
    baseline: Option<usize>,
    default_quality: Quality,
    baseline_quality: Quality,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&TransformConfig::default())
    }
}

impl Session {
    pub fn new(config: &TransformConfig) -> Self {
        Self {
            library: ImageLibrary::new(),
            active: None,
            params: None,
            baseline: None,
            default_quality: config.default_quality,
            baseline_quality: config.baseline_quality,
        }
    }

    pub fn library(&self) -> &ImageLibrary {
        &self.library
    }

    pub fn add_uploads(
        &mut self,
        backend: &impl ImageBackend,
        uploads: &[Upload],
        accepted_extensions: &[String],
    ) -> IngestReport {
        acquire::ingest_uploads(&mut self.library, backend, uploads, accepted_extensions)
    }

    pub fn fetch_url(
        &mut self,
        backend: &impl ImageBackend,
        fetcher: &impl Fetcher,
        url: &str,
    ) -> Result<String, AcquireError> {
        acquire::ingest_url(&mut self.library, backend, fetcher, url)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn params(&self) -> Option<TransformParams> {
        self.params
    }

    fn active_entry(&self) -> Result<&LibraryEntry, SessionError> {
        let name = self.active.as_deref().ok_or(SessionError::NoSelection)?;
        Ok(self.library.get(name)?)
    }

    fn params_mut(&mut self) -> Result<&mut TransformParams, SessionError> {
        self.params.as_mut().ok_or(SessionError::NoSelection)
    }

    /// Make `name` the active entry.
    ///
    /// Switching to a different entry resets the parameters to its native
    /// size and the default quality. Re-selecting the active entry keeps them.
    pub fn select(&mut self, name: &str) -> Result<(), SessionError> {
        if self.active.as_deref() == Some(name) {
            return Ok(());
        }
        let entry = self.library.get(name)?;
        let params = TransformParams::native(entry.dimensions(), self.default_quality);
        debug!(name, width = params.width, height = params.height, "selected");
        self.active = Some(name.to_string());
        self.params = Some(params);
        self.baseline = None;
        Ok(())
    }

    pub fn set_width(&mut self, width: u32) -> Result<(), SessionError> {
        let params = self.params_mut()?;
        TransformParams { width, ..*params }.validate()?;
        params.width = width;
        Ok(())
    }

    pub fn set_height(&mut self, height: u32) -> Result<(), SessionError> {
        let params = self.params_mut()?;
        TransformParams { height, ..*params }.validate()?;
        params.height = height;
        Ok(())
    }

    /// Set quality, clamped into 10–100 like a slider would.
    pub fn set_quality(&mut self, quality: u32) -> Result<(), SessionError> {
        self.params_mut()?.quality = Quality::new(quality);
        Ok(())
    }

    /// Set the width and derive the height from the source aspect ratio.
    pub fn fit_width(&mut self, width: u32) -> Result<(), SessionError> {
        let source = self.active_entry()?.dimensions();
        let height = height_for_width((source.width, source.height), width);
        self.set_dimensions(width, height)
    }

    /// Set the height and derive the width from the source aspect ratio.
    pub fn fit_height(&mut self, height: u32) -> Result<(), SessionError> {
        let source = self.active_entry()?.dimensions();
        let width = width_for_height((source.width, source.height), height);
        self.set_dimensions(width, height)
    }

    /// Set both edges, or neither when either is out of range.
    fn set_dimensions(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        let params = self.params_mut()?;
        let next = TransformParams {
            width,
            height,
            ..*params
        };
        next.validate()?;
        *params = next;
        Ok(())
    }

    /// Baseline size estimate of the active entry, computed once per selection.
    pub fn estimated_size(&mut self, backend: &impl ImageBackend) -> Result<usize, SessionError> {
        if let Some(size) = self.baseline {
            return Ok(size);
        }
        let size =
            estimate_baseline_size(backend, &self.active_entry()?.image, self.baseline_quality)?;
        self.baseline = Some(size);
        Ok(size)
    }

    /// Run the transform for the current parameters.
    pub fn preview(&mut self, backend: &impl ImageBackend) -> Result<LivePreview, SessionError> {
        let estimated_bytes = self.estimated_size(backend)?;
        let params = self.params.ok_or(SessionError::NoSelection)?;
        let entry = self.active_entry()?;

        let output = transform(backend, &entry.image, &params)?;
        let report = PreviewReport {
            name: entry.name.clone(),
            source: entry.dimensions(),
            estimated_bytes,
            source_bytes: entry.source_len,
            params,
            result: output.dimensions(),
            result_bytes: output.size(),
            change: SizeChange::between(estimated_bytes, output.size()),
            export_filename: export_filename(&entry.name),
        };
        Ok(LivePreview { output, report })
    }

    /// The downloadable result for the current parameters.
    pub fn export(&mut self, backend: &impl ImageBackend) -> Result<Artifact, SessionError> {
        let artifact = self.preview(backend)?.into_artifact();
        info!(
            filename = %artifact.filename,
            bytes = artifact.bytes.len(),
            "exported"
        );
        Ok(artifact)
    }

    /// One summary row per library entry, in insertion order.
    pub fn summaries(
        &self,
        backend: &impl ImageBackend,
    ) -> Result<Vec<EntrySummary>, SessionError> {
        self.library
            .entries()
            .map(|entry| -> Result<EntrySummary, SessionError> {
                Ok(EntrySummary {
                    name: entry.name.clone(),
                    dimensions: entry.dimensions(),
                    estimated_bytes: estimate_baseline_size(
                        backend,
                        &entry.image,
                        self.baseline_quality,
                    )?,
                    source_bytes: entry.source_len,
                    url: match &entry.origin {
                        Origin::Url(url) => Some(url.clone()),
                        Origin::Upload => None,
                    },
                })
            })
            .collect()
    }

    /// Dimensions of the active entry, if any.
    pub fn active_dimensions(&self) -> Option<Dimensions> {
        self.active_entry().ok().map(LibraryEntry::dimensions)
    }
}
